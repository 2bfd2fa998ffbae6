//! GPU buffer layouts for density interpolation.
//!
//! # Memory Layout
//!
//! - [`GpuDensityPoint`]: 16 bytes (vec2 position, density, padding)
//! - [`GpuGridParams`]: 16 bytes (uniform buffer)

use bytemuck::{Pod, Zeroable};
use scan_types::DensityPoint;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages};

use crate::context::GpuContext;
use crate::error::{GpuError, GpuResult};

/// Density sample projected to XY, laid out for a WGSL storage array.
///
/// # Example
///
/// ```
/// use density_gpu::GpuDensityPoint;
///
/// let p = GpuDensityPoint::new([0.25, 0.75], 0.5);
/// assert_eq!(std::mem::size_of::<GpuDensityPoint>(), 16);
/// assert_eq!(p.position, [0.25, 0.75]);
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuDensityPoint {
    /// XY position.
    pub position: [f32; 2],
    /// Density value.
    pub density: f32,
    _padding: f32,
}

impl GpuDensityPoint {
    /// Create a GPU density point.
    #[must_use]
    pub const fn new(position: [f32; 2], density: f32) -> Self {
        Self {
            position,
            density,
            _padding: 0.0,
        }
    }
}

impl From<&DensityPoint> for GpuDensityPoint {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 is intentional for GPU upload
    fn from(point: &DensityPoint) -> Self {
        Self::new(
            [point.position.x as f32, point.position.y as f32],
            point.density as f32,
        )
    }
}

/// Uniform parameters for the interpolation shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuGridParams {
    /// Cells per grid side.
    pub grid_size: u32,
    /// Number of points in the point buffer.
    pub point_count: u32,
    /// Points closer than this to a cell center set the cell directly.
    pub near_distance: f32,
    _padding: u32,
}

impl GpuGridParams {
    /// Create grid parameters.
    ///
    /// # Example
    ///
    /// ```
    /// use density_gpu::GpuGridParams;
    ///
    /// let params = GpuGridParams::new(64, 100, 1e-3);
    /// assert_eq!(params.grid_size, 64);
    /// assert_eq!(std::mem::size_of::<GpuGridParams>(), 16);
    /// ```
    #[must_use]
    pub const fn new(grid_size: u32, point_count: u32, near_distance: f32) -> Self {
        Self {
            grid_size,
            point_count,
            near_distance,
            _padding: 0,
        }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }
}

/// Density points uploaded to a storage buffer.
pub struct PointBuffers {
    /// Storage buffer of [`GpuDensityPoint`].
    pub points: Buffer,
    /// Number of uploaded points.
    pub point_count: u32,
}

impl PointBuffers {
    /// Upload density points.
    ///
    /// # Errors
    ///
    /// - [`GpuError::NoPoints`] if `points` is empty
    /// - [`GpuError::TooManyPoints`] if the points exceed one storage binding
    pub fn upload(ctx: &GpuContext, points: &[DensityPoint]) -> GpuResult<Self> {
        if points.is_empty() {
            return Err(GpuError::NoPoints);
        }

        let max_points = ctx.max_storage_buffer_size() as usize / size_of::<GpuDensityPoint>();
        let point_count = u32::try_from(points.len())
            .ok()
            .filter(|_| points.len() <= max_points)
            .ok_or(GpuError::TooManyPoints {
                points: points.len(),
                max: max_points,
            })?;

        let gpu_points: Vec<GpuDensityPoint> = points.iter().map(GpuDensityPoint::from).collect();
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("idw_points"),
                contents: bytemuck::cast_slice(&gpu_points),
                usage: BufferUsages::STORAGE,
            });

        Ok(Self {
            points: buffer,
            point_count,
        })
    }
}

/// Parameter uniform and output cells for one grid.
pub struct GridBuffers {
    /// Uniform buffer holding [`GpuGridParams`].
    pub params: Buffer,
    /// Storage buffer of `f32` cell values, row-major.
    pub cells: Buffer,
    /// Number of cells.
    pub cell_count: usize,
}

impl GridBuffers {
    /// Allocate buffers for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`GpuError::GridTooLarge`] if the cells exceed one storage binding.
    pub fn allocate(ctx: &GpuContext, params: &GpuGridParams) -> GpuResult<Self> {
        let cell_count = params.cell_count();
        let max_cells = ctx.max_storage_buffer_size() as usize / size_of::<f32>();
        if cell_count == 0 || cell_count > max_cells {
            return Err(GpuError::GridTooLarge {
                cells: cell_count,
                max: max_cells,
            });
        }

        let params_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("idw_params"),
                contents: bytemuck::bytes_of(params),
                usage: BufferUsages::UNIFORM,
            });

        let cells = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("idw_cells"),
            size: (cell_count * size_of::<f32>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        Ok(Self {
            params: params_buffer,
            cells,
            cell_count,
        })
    }

    /// Read the cell values back to the CPU.
    ///
    /// # Errors
    ///
    /// Returns [`GpuError::BufferMapping`] if the readback fails.
    pub fn download_cells(&self, ctx: &GpuContext) -> GpuResult<Vec<f32>> {
        let size = self.cells.size();

        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("idw_staging"),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("idw_download"),
            });
        encoder.copy_buffer_to_buffer(&self.cells, 0, &staging, 0, size);
        ctx.queue.submit([encoder.finish()]);

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // Receiver outlives the poll below; a failed send is reported as channel closed
            let _ = tx.send(result);
        });

        ctx.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| GpuError::BufferMapping("channel closed".into()))?
            .map_err(|e| GpuError::BufferMapping(format!("{e:?}")))?;

        let data = slice.get_mapped_range();
        let values: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(values)
    }
}
