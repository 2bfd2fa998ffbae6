//! Lazily initialized GPU device.
//!
//! The device and queue are a process-wide resource created on first use.
//! Every interpolation allocates its own buffers, so invocations share
//! nothing beyond the device itself.
//!
//! # Example
//!
//! ```no_run
//! use density_gpu::GpuContext;
//!
//! match GpuContext::get() {
//!     Some(ctx) => println!("interpolating on {}", ctx.adapter_info.name),
//!     None => println!("no GPU, using the CPU backends"),
//! }
//! ```

use std::sync::OnceLock;

use tracing::{debug, info, warn};
use wgpu::{Device, DeviceDescriptor, Instance, Queue, RequestAdapterOptions};

use crate::error::{GpuError, GpuResult};

/// Global GPU context, lazily initialized on first access.
static GPU_CONTEXT: OnceLock<Option<GpuContext>> = OnceLock::new();

/// The adapter a context was created on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuAdapterInfo {
    /// Device name as reported by the driver.
    pub name: String,
    /// Backend API (Vulkan, Metal, Dx12, Gl).
    pub backend: String,
    /// Whether the adapter is a software rasterizer. Interpolation still
    /// works there but is usually slower than the parallel CPU backend.
    pub software: bool,
}

impl From<wgpu::AdapterInfo> for GpuAdapterInfo {
    fn from(info: wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name,
            backend: format!("{:?}", info.backend),
            software: info.device_type == wgpu::DeviceType::Cpu,
        }
    }
}

/// GPU device, queue and limits.
///
/// Use [`GpuContext::get`] for the shared instance. The device and queue are
/// safe to use from several threads.
pub struct GpuContext {
    /// Device for creating buffers and pipelines.
    pub device: Device,
    /// Queue for submitting work.
    pub queue: Queue,
    /// The selected adapter.
    pub adapter_info: GpuAdapterInfo,
    /// Device limits used to size buffers and dispatches.
    pub limits: wgpu::Limits,
}

impl GpuContext {
    /// Get or initialize the global GPU context.
    ///
    /// Returns `None` when no adapter or device could be obtained. The
    /// outcome is cached, so a failed probe is not retried.
    #[must_use]
    pub fn get() -> Option<&'static Self> {
        GPU_CONTEXT
            .get_or_init(
                || match pollster::block_on(Self::try_init()) {
                    Ok(ctx) => {
                        info!(
                            adapter = %ctx.adapter_info.name,
                            backend = %ctx.adapter_info.backend,
                            software = ctx.adapter_info.software,
                            "GPU context initialized"
                        );
                        Some(ctx)
                    }
                    Err(e) => {
                        warn!("GPU initialization failed: {}", e);
                        None
                    }
                },
            )
            .as_ref()
    }

    /// Get the global GPU context or an error.
    ///
    /// # Errors
    ///
    /// Returns [`GpuError::NotAvailable`] if no GPU is available.
    pub fn try_get() -> GpuResult<&'static Self> {
        Self::get().ok_or(GpuError::NotAvailable)
    }

    /// Whether a GPU context can be obtained. Initializes it on first call.
    #[must_use]
    pub fn is_available() -> bool {
        Self::get().is_some()
    }

    async fn try_init() -> GpuResult<Self> {
        debug!("initializing GPU context");

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok_or(GpuError::NotAvailable)?;

        let adapter_info = adapter.get_info();
        debug!(
            name = %adapter_info.name,
            device_type = ?adapter_info.device_type,
            backend = ?adapter_info.backend,
            "GPU adapter found"
        );

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("density-gpu"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| GpuError::Execution(format!("device request failed: {e}")))?;

        let limits = device.limits();

        Ok(Self {
            device,
            queue,
            adapter_info: adapter_info.into(),
            limits,
        })
    }

    /// Maximum size of one storage buffer binding in bytes.
    #[must_use]
    pub const fn max_storage_buffer_size(&self) -> u32 {
        self.limits.max_storage_buffer_binding_size
    }

    /// Maximum workgroups in one dispatch dimension.
    #[must_use]
    pub const fn max_workgroups_per_dimension(&self) -> u32 {
        self.limits.max_compute_workgroups_per_dimension
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("adapter_info", &self.adapter_info)
            .field(
                "max_storage_buffer_size",
                &self.limits.max_storage_buffer_binding_size,
            )
            .finish_non_exhaustive()
    }
}
