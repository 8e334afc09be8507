use super::{DeviceInit, SetupError};

/// Owns the wgpu instance, adapter, logical device and its submission queue.
///
/// Created once at startup and kept for the lifetime of the render context.
pub struct DeviceContext {
    /// wgpu instance used to create the adapter and surfaces.
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue. The only submission channel for this device.
    queue: wgpu::Queue,
}

impl DeviceContext {
    /// Creates a wgpu instance restricted to the configured backends.
    pub fn create_instance(init: &DeviceInit) -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        })
    }

    /// Requests an adapter able to present to `compatible_surface`, then a device.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn acquire(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        init: &DeviceInit,
    ) -> Result<Self, SetupError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SetupError::NoCapableDevice(format!("no suitable adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!(
            "using adapter \"{}\" ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("delta device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SetupError::NoCapableDevice(format!("device request failed: {e}")))?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Acquires a device without a presentation surface.
    ///
    /// Intended for offscreen rendering and tests.
    pub async fn acquire_headless(init: &DeviceInit) -> Result<Self, SetupError> {
        let instance = Self::create_instance(init);
        Self::acquire(instance, None, init).await
    }

    /// Returns the wgpu instance.
    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    /// Returns the selected adapter.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the device's single submission queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Whether the adapter can use `format` as a render attachment.
    pub fn supports_render_target(&self, format: wgpu::TextureFormat) -> bool {
        self.adapter
            .get_texture_format_features(format)
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    }
}
