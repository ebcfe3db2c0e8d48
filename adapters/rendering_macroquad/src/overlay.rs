//! Screen-space drawing of the status overlay.
//!
//! Layout is computed separately from drawing so it can be checked without a
//! window.

use glam::Vec2;
use macroquad::{
    shapes::{draw_circle, draw_rectangle},
    text::{draw_text, measure_text},
};
use pledge_lungs_rendering::{Color, Overlay};

use crate::to_macroquad_color;

const MARGIN: f32 = 24.0;
const TITLE_SIZE: u16 = 36;
const CAPTION_SIZE: u16 = 22;
const MESSAGE_SIZE: u16 = 22;
const BAR_HEIGHT: f32 = 14.0;
const MESSAGE_PADDING: f32 = 12.0;
const MARKER_RADIUS: f32 = 4.0;
const MARKER_COLOR: Color = Color::new(0.53, 0.94, 0.67, 0.7);

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScreenRect {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

/// Pixel placement of every overlay element for a given screen size.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OverlayLayout {
    pub(crate) title_baseline: Vec2,
    pub(crate) caption_baseline: Vec2,
    pub(crate) bar_track: ScreenRect,
    pub(crate) bar_fill: ScreenRect,
    pub(crate) message_panel: ScreenRect,
    pub(crate) markers: Vec<Vec2>,
}

impl OverlayLayout {
    pub(crate) fn compute(overlay: &Overlay, screen_width: f32, screen_height: f32) -> Self {
        let content_width = (screen_width - 2.0 * MARGIN).max(0.0);
        let title_baseline = Vec2::new(MARGIN, MARGIN + f32::from(TITLE_SIZE));
        let caption_baseline = Vec2::new(
            MARGIN,
            title_baseline.y + MESSAGE_PADDING + f32::from(CAPTION_SIZE),
        );

        let bar_track = ScreenRect {
            x: MARGIN,
            y: caption_baseline.y + MESSAGE_PADDING,
            width: content_width,
            height: BAR_HEIGHT,
        };
        let bar_fill = ScreenRect {
            width: content_width * overlay.progress_bar.fill_fraction.clamp(0.0, 1.0),
            ..bar_track
        };

        let message_height = f32::from(MESSAGE_SIZE) + 2.0 * MESSAGE_PADDING;
        let message_panel = ScreenRect {
            x: MARGIN,
            y: (screen_height - MARGIN - message_height).max(bar_track.y + BAR_HEIGHT),
            width: content_width,
            height: message_height,
        };

        let markers = overlay
            .markers
            .iter()
            .map(|marker| {
                Vec2::new(
                    marker.position.x * screen_width,
                    marker.position.y * screen_height,
                )
            })
            .collect();

        Self {
            title_baseline,
            caption_baseline,
            bar_track,
            bar_fill,
            message_panel,
            markers,
        }
    }
}

/// Draws the overlay on top of whatever has already been rendered.
pub(crate) fn draw_overlay(overlay: &Overlay, screen_width: f32, screen_height: f32) {
    let layout = OverlayLayout::compute(overlay, screen_width, screen_height);

    let marker_color = to_macroquad_color(MARKER_COLOR);
    for marker in &layout.markers {
        draw_circle(marker.x, marker.y, MARKER_RADIUS, marker_color);
    }

    let _ = draw_text(
        overlay.title,
        layout.title_baseline.x,
        layout.title_baseline.y,
        f32::from(TITLE_SIZE),
        to_macroquad_color(Color::WHITE),
    );
    let _ = draw_text(
        &overlay.caption,
        layout.caption_baseline.x,
        layout.caption_baseline.y,
        f32::from(CAPTION_SIZE),
        to_macroquad_color(Color::WHITE.with_alpha(0.85)),
    );

    fill_rect(layout.bar_track, overlay.progress_bar.track_color);
    if layout.bar_fill.width > 0.0 {
        fill_rect(layout.bar_fill, overlay.progress_bar.fill_color);
    }

    let message = overlay.message;
    fill_rect(layout.message_panel, message.accent_color);
    let text_size = measure_text(message.text, None, MESSAGE_SIZE, 1.0);
    let text_x = layout.message_panel.x
        + ((layout.message_panel.width - text_size.width) * 0.5).max(MESSAGE_PADDING);
    let text_y = layout.message_panel.y + MESSAGE_PADDING + f32::from(MESSAGE_SIZE) * 0.8;
    let _ = draw_text(
        message.text,
        text_x,
        text_y,
        f32::from(MESSAGE_SIZE),
        to_macroquad_color(message.text_color),
    );
}

fn fill_rect(rect: ScreenRect, color: Color) {
    draw_rectangle(
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        to_macroquad_color(color),
    );
}
