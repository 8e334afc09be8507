/// Background color the target is cleared to at the start of every frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Load/store policy for the pass's only color attachment.
///
/// There is exactly one attachment, so this is a plain descriptor rather than a list.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorAttachment {
    pub clear: wgpu::Color,
    pub store: wgpu::StoreOp,
}

impl ColorAttachment {
    pub fn operations(&self) -> wgpu::Operations<wgpu::Color> {
        wgpu::Operations {
            load: wgpu::LoadOp::Clear(self.clear),
            store: self.store,
        }
    }
}

impl Default for ColorAttachment {
    fn default() -> Self {
        Self {
            clear: CLEAR_COLOR,
            store: wgpu::StoreOp::Store,
        }
    }
}

/// Non-indexed draw with no vertex buffers bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl DrawCall {
    /// One triangle, one instance.
    pub const TRIANGLE: Self = Self {
        vertex_count: 3,
        instance_count: 1,
    };
}
