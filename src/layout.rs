//! Per-vertex attribute layouts.
//!
//! Every mesh stores its vertices as a flat `Vec<f32>`. The [`VertexMode`] picked at
//! construction decides which attributes each vertex carries, and [`VertexLayout`] turns that
//! into scalar counts, byte offsets and a wgpu buffer layout.
//!
//! | Mode               | Attributes (in order)   | Floats | Stride |
//! |--------------------|-------------------------|--------|--------|
//! | `PositionColor`    | position, color         | 7      | 28     |
//! | `PositionUv`       | position, uv            | 5      | 20     |
//! | `PositionColorUv`  | position, color, uv     | 9      | 36     |
//! | `PositionNormalUv` | position, normal, uv    | 8      | 32     |
//!
//! Shader locations are fixed per attribute regardless of mode:
//!
//! | Attribute | Format    | Shader Location |
//! |-----------|-----------|-----------------|
//! | position  | Float32x3 | 0               |
//! | color     | Float32x4 | 1               |
//! | normal    | Float32x3 | 2               |
//! | uv        | Float32x2 | 3               |

/// Which attributes a mesh's vertex buffer encodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexMode {
    /// Position and RGBA color, shared vertices with an index buffer.
    #[default]
    PositionColor,
    /// Position and texture coordinates.
    PositionUv,
    /// Position, color and texture coordinates. No generator implements this mode.
    PositionColorUv,
    /// Position, normal and texture coordinates, for lit rendering.
    PositionNormalUv,
}

impl VertexMode {
    /// All modes, in declaration order.
    pub const ALL: [VertexMode; 4] = [
        VertexMode::PositionColor,
        VertexMode::PositionUv,
        VertexMode::PositionColorUv,
        VertexMode::PositionNormalUv,
    ];

    /// Modes that the built-in generators can triangulate.
    pub const SUPPORTED: [VertexMode; 3] = [
        VertexMode::PositionColor,
        VertexMode::PositionUv,
        VertexMode::PositionNormalUv,
    ];

    /// Returns the attribute layout for this mode.
    pub const fn layout(self) -> VertexLayout {
        VertexLayout::new(self)
    }

    /// Returns true if generators can produce geometry for this mode.
    pub const fn is_supported(self) -> bool {
        !matches!(self, VertexMode::PositionColorUv)
    }
}

/// Units a composite's authored centimeter dimensions are presented in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitOfMeasure {
    #[default]
    Centimeter,
    Inch,
}

impl UnitOfMeasure {
    /// Centimeters to inches, as applied by the composites.
    pub const CENTIMETERS_TO_INCHES: f32 = 0.394;

    /// The uniform scale to apply to centimeter geometry.
    pub fn scale_factor(self) -> f32 {
        match self {
            UnitOfMeasure::Centimeter => 1.0,
            UnitOfMeasure::Inch => Self::CENTIMETERS_TO_INCHES,
        }
    }
}

const POSITION_ATTRIBUTE: wgpu::VertexAttribute = wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
};

const POSITION_COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    POSITION_ATTRIBUTE,
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x4,
    },
];

const POSITION_UV_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    POSITION_ATTRIBUTE,
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x2,
    },
];

const POSITION_COLOR_UV_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    POSITION_ATTRIBUTE,
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: 28,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x2,
    },
];

const POSITION_NORMAL_UV_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    POSITION_ATTRIBUTE,
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 24,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Scalar counts per attribute for a [`VertexMode`].
///
/// A zero count means the attribute is absent. Offsets follow the storage order
/// position, color, normal, uv.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    mode: VertexMode,
    pub floats_per_position: usize,
    pub floats_per_color: usize,
    pub floats_per_normal: usize,
    pub floats_per_uv: usize,
}

impl VertexLayout {
    pub const FLOATS_PER_POSITION: usize = 3;
    pub const FLOATS_PER_COLOR: usize = 4;
    pub const FLOATS_PER_NORMAL: usize = 3;
    pub const FLOATS_PER_UV: usize = 2;

    pub const fn new(mode: VertexMode) -> Self {
        let (color, normal, uv) = match mode {
            VertexMode::PositionColor => (Self::FLOATS_PER_COLOR, 0, 0),
            VertexMode::PositionUv => (0, 0, Self::FLOATS_PER_UV),
            VertexMode::PositionColorUv => (Self::FLOATS_PER_COLOR, 0, Self::FLOATS_PER_UV),
            VertexMode::PositionNormalUv => (0, Self::FLOATS_PER_NORMAL, Self::FLOATS_PER_UV),
        };
        Self {
            mode,
            floats_per_position: Self::FLOATS_PER_POSITION,
            floats_per_color: color,
            floats_per_normal: normal,
            floats_per_uv: uv,
        }
    }

    pub const fn mode(&self) -> VertexMode {
        self.mode
    }

    /// Total scalars per vertex.
    pub const fn floats_per_vertex(&self) -> usize {
        self.floats_per_position + self.floats_per_color + self.floats_per_normal + self.floats_per_uv
    }

    /// Bytes between consecutive vertices.
    pub const fn stride(&self) -> usize {
        self.floats_per_vertex() * std::mem::size_of::<f32>()
    }

    pub const fn has_color(&self) -> bool {
        self.floats_per_color > 0
    }

    pub const fn has_normal(&self) -> bool {
        self.floats_per_normal > 0
    }

    pub const fn has_uv(&self) -> bool {
        self.floats_per_uv > 0
    }

    /// Scalar offset of the color within a vertex.
    pub const fn color_offset(&self) -> usize {
        self.floats_per_position
    }

    /// Scalar offset of the normal within a vertex.
    pub const fn normal_offset(&self) -> usize {
        self.floats_per_position + self.floats_per_color
    }

    /// Scalar offset of the texture coordinates within a vertex.
    pub const fn uv_offset(&self) -> usize {
        self.floats_per_position + self.floats_per_color + self.floats_per_normal
    }

    /// The wgpu attributes for this layout, at the fixed shader locations.
    pub const fn attributes(&self) -> &'static [wgpu::VertexAttribute] {
        match self.mode {
            VertexMode::PositionColor => &POSITION_COLOR_ATTRIBUTES,
            VertexMode::PositionUv => &POSITION_UV_ATTRIBUTES,
            VertexMode::PositionColorUv => &POSITION_COLOR_UV_ATTRIBUTES,
            VertexMode::PositionNormalUv => &POSITION_NORMAL_UV_ATTRIBUTES,
        }
    }

    /// The vertex buffer layout to use when creating a render pipeline.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let layout = VertexMode::PositionNormalUv.layout();
    /// let vertex = wgpu::VertexState {
    ///     module: &shader,
    ///     entry_point: Some("vs"),
    ///     buffers: &[layout.buffer_layout()],
    ///     compilation_options: Default::default(),
    /// };
    /// ```
    pub const fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.attributes(),
        }
    }
}

impl From<VertexMode> for VertexLayout {
    fn from(mode: VertexMode) -> Self {
        Self::new(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_attribute_counts() {
        assert_eq!(VertexMode::PositionColor.layout().stride(), 28);
        assert_eq!(VertexMode::PositionUv.layout().stride(), 20);
        assert_eq!(VertexMode::PositionColorUv.layout().stride(), 36);
        assert_eq!(VertexMode::PositionNormalUv.layout().stride(), 32);
    }

    #[test]
    fn offsets_follow_storage_order() {
        let lit = VertexMode::PositionNormalUv.layout();
        assert_eq!(lit.normal_offset(), 3);
        assert_eq!(lit.uv_offset(), 6);
        assert!(!lit.has_color());

        let textured = VertexMode::PositionUv.layout();
        assert_eq!(textured.uv_offset(), 3);
        assert!(!textured.has_normal());
    }

    #[test]
    fn wgpu_attributes_agree_with_offsets() {
        for mode in VertexMode::ALL {
            let layout = mode.layout();
            let last = layout.attributes().last().copied();
            let end = last.map(|a| a.offset + a.format.size()).unwrap_or(0);
            assert_eq!(end as usize, layout.stride(), "{mode:?}");
        }
    }

    #[test]
    fn only_color_uv_is_unsupported() {
        let unsupported: Vec<_> = VertexMode::ALL
            .into_iter()
            .filter(|m| !m.is_supported())
            .collect();
        assert_eq!(unsupported, vec![VertexMode::PositionColorUv]);
    }

    #[test]
    fn inch_scale() {
        assert_eq!(UnitOfMeasure::Centimeter.scale_factor(), 1.0);
        assert_eq!(UnitOfMeasure::Inch.scale_factor(), 0.394);
    }
}
