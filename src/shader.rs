//! Presentation shader and its instance data.
//!
//! Everything on screen is an instanced quad in pixel coordinates: buffer
//! blits sample the world texture, outlines and the zoom bar are solid.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::controller::FramePlan;
use crate::selection::Outline;
use crate::viewport::{Blit, ZoomBar};

pub const CANVAS_SHADER: &str = include_str!("canvas.wgsl");

pub const SELECTION_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 0.9];
pub const HOVER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
const BAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
const INDICATOR_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const OUTLINE_THICKNESS: f32 = 3.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ScreenUniforms {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl ScreenUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width.max(1) as f32, height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// One instanced quad. 64 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub dst_min: [f32; 2],
    pub dst_max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub color: [f32; 4],
    pub textured: u32,
    pub _pad: [u32; 3],
}

impl QuadInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x4,
        5 => Uint32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// A copy of part of the world texture.
    pub fn textured(blit: &Blit, world: Vec2) -> Self {
        Self {
            dst_min: blit.dst_min.to_array(),
            dst_max: blit.dst_max.to_array(),
            uv_min: (blit.src_min / world).to_array(),
            uv_max: (blit.src_max / world).to_array(),
            color: [1.0; 4],
            textured: 1,
            _pad: [0; 3],
        }
    }

    pub fn solid(min: Vec2, max: Vec2, color: [f32; 4]) -> Self {
        Self {
            dst_min: min.to_array(),
            dst_max: max.to_array(),
            uv_min: [0.0; 2],
            uv_max: [0.0; 2],
            color,
            textured: 0,
            _pad: [0; 3],
        }
    }
}

/// Four solid edges of an outline square. Empty while the square has no size.
pub fn outline_quads(outline: &Outline, thickness: f32, color: [f32; 4]) -> Vec<QuadInstance> {
    let half = outline.side * 0.5;
    if half <= 0.0 {
        return Vec::new();
    }
    let min = outline.centre - Vec2::splat(half);
    let max = outline.centre + Vec2::splat(half);
    let t = thickness.min(half);
    vec![
        QuadInstance::solid(min, Vec2::new(max.x, min.y + t), color),
        QuadInstance::solid(Vec2::new(min.x, max.y - t), max, color),
        QuadInstance::solid(Vec2::new(min.x, min.y + t), Vec2::new(min.x + t, max.y - t), color),
        QuadInstance::solid(Vec2::new(max.x - t, min.y + t), Vec2::new(max.x, max.y - t), color),
    ]
}

/// Bar line plus a horizontal indicator at the current zoom.
pub fn zoom_bar_quads(bar: &ZoomBar, fraction: f32) -> Vec<QuadInstance> {
    let y = bar.y_at(fraction);
    vec![
        QuadInstance::solid(
            Vec2::new(bar.x - 1.0, bar.top),
            Vec2::new(bar.x + 1.0, bar.top + bar.height),
            BAR_COLOR,
        ),
        QuadInstance::solid(Vec2::new(bar.x - 10.0, y - 1.5), Vec2::new(bar.x + 10.0, y + 1.5), INDICATOR_COLOR),
    ]
}

/// All quads for a frame, blits first so outlines draw on top.
pub fn frame_quads(plan: &FramePlan, world: Vec2, with_zoom_bar: bool) -> Vec<QuadInstance> {
    let mut quads: Vec<QuadInstance> = plan
        .blits
        .iter()
        .map(|b| QuadInstance::textured(b, world))
        .collect();
    if let Some(hover) = &plan.hover {
        quads.extend(outline_quads(&hover.outline, OUTLINE_THICKNESS, HOVER_COLOR));
    }
    if let Some(sel) = &plan.selection {
        quads.extend(outline_quads(&sel.outline, OUTLINE_THICKNESS, SELECTION_COLOR));
    }
    if with_zoom_bar {
        quads.extend(zoom_bar_quads(&plan.zoom_bar, plan.zoom_bar_fraction));
    }
    quads
}
