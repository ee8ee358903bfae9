//! Error types for mesh generation, texture loading and scene setup.
//!
//! Everything in this crate fails fast: every error here describes a setup mistake
//! (an unsupported vertex mode, a negative radius, a clamp set too late, a missing GPU)
//! and is reported to the caller instead of producing partial geometry.

use crate::layout::VertexMode;

/// Errors produced while generating or editing mesh geometry.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The shape has no triangulation for this vertex mode.
    #[error("vertex mode {0:?} is not implemented")]
    UnsupportedVertexMode(VertexMode),

    /// A dimension or subdivision count is out of range.
    #[error("invalid {shape} parameter `{name}`: {value}")]
    InvalidParameter {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },

    /// Texture clamps are read during triangulation and cannot change afterwards.
    #[error("texture clamp must be set before vertices are generated")]
    ClampAfterGeneration,

    /// A sub-part of a composite mesh failed to generate.
    #[error("failed to build part `{part}`")]
    Part {
        part: &'static str,
        #[source]
        source: Box<MeshError>,
    },
}

impl MeshError {
    /// Wrap this error with the name of the composite part that produced it.
    pub fn in_part(self, part: &'static str) -> Self {
        Self::Part {
            part,
            source: Box::new(self),
        }
    }
}

/// Errors produced while loading a texture from disk.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode texture `{path}`")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Errors produced while bringing up the window, GPU and scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    IncompatibleSurface,

    #[error("event loop error")]
    EventLoop(#[from] winit::error::EventLoopError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_error_keeps_source() {
        let err = MeshError::UnsupportedVertexMode(VertexMode::PositionColorUv).in_part("body");
        assert_eq!(err.to_string(), "failed to build part `body`");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("vertex mode PositionColorUv is not implemented")
        );
    }

    #[test]
    fn invalid_parameter_message() {
        let err = MeshError::InvalidParameter {
            shape: "sphere",
            name: "radius",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "invalid sphere parameter `radius`: -1");
    }
}
