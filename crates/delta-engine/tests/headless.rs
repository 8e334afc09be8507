use delta_engine::device::{DeviceContext, DeviceInit, FrameError, OffscreenTarget, TargetSource};
use delta_engine::frame::{DrawCall, FrameEncoder, FrameState, WgpuFrameBackend};
use delta_engine::pipeline::{PipelineBuildError, PipelineBuilder};
use delta_engine::shader::{EntryPoints, ShaderModule, ShaderStage, TRIANGLE_WGSL};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn headless_device(test: &str) -> Option<DeviceContext> {
    let init = DeviceInit {
        power_preference: wgpu::PowerPreference::LowPower,
        required_limits: wgpu::Limits::downlevel_defaults(),
        ..DeviceInit::default()
    };

    match pollster::block_on(DeviceContext::acquire_headless(&init)) {
        Ok(device) => Some(device),
        Err(e) => {
            eprintln!("skipping {test}: {e}");
            None
        }
    }
}

/// Copies `texture` (4 bytes per texel, 64-texel aligned width) into host memory.
fn read_rgba8(device: &DeviceContext, texture: &wgpu::Texture, width: u32, height: u32) -> Vec<u8> {
    let bytes_per_row = width * 4;
    assert_eq!(bytes_per_row % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0);

    let staging = device.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("delta readback"),
        size: u64::from(bytes_per_row * height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("delta readback encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    device.queue().submit([encoder.finish()]);

    let slice = staging.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |r| {
        sender.send(r).ok();
    });
    device
        .device()
        .poll(wgpu::PollType::wait_indefinitely())
        .expect("device poll");
    receiver
        .recv()
        .expect("map callback ran")
        .expect("readback buffer maps");

    let pixels = slice.get_mapped_range().to_vec();
    staging.unmap();
    pixels
}

fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn triangle(device: &DeviceContext) -> ShaderModule {
    ShaderModule::compile(device, "triangle", TRIANGLE_WGSL, EntryPoints::new("vs", "fs"))
        .expect("built-in shader compiles")
}

#[test]
fn triangle_frame_is_submitted_once() {
    let Some(device) = headless_device("triangle_frame_is_submitted_once") else {
        return;
    };

    let shader = triangle(&device);
    let pipeline = PipelineBuilder::new(&device)
        .build(&shader, "vs", "fs", FORMAT)
        .expect("pipeline builds");
    assert_eq!(pipeline.target_format(), FORMAT);
    assert_eq!(pipeline.vertex_entry(), "vs");
    assert_eq!(pipeline.fragment_entry(), "fs");

    let mut target = OffscreenTarget::new(&device, FORMAT, 64, 64);
    let mut encoder = FrameEncoder::new();

    let report = {
        let mut backend = WgpuFrameBackend::new(&device, &mut target);
        encoder.encode(&mut backend, &pipeline).expect("frame encodes")
    };

    assert_eq!(report.frame_index, 0);
    assert_eq!(report.draw, DrawCall::TRIANGLE);
    assert_eq!(encoder.frames_submitted(), 1);
    assert_eq!(encoder.state(), FrameState::Idle);
}

#[test]
fn consecutive_frames_get_fresh_views() {
    let Some(device) = headless_device("consecutive_frames_get_fresh_views") else {
        return;
    };

    let shader = triangle(&device);
    let pipeline = PipelineBuilder::new(&device)
        .build(&shader, "vs", "fs", FORMAT)
        .expect("pipeline builds");

    let mut target = OffscreenTarget::new(&device, FORMAT, 16, 16);
    let mut encoder = FrameEncoder::new();
    let mut backend = WgpuFrameBackend::new(&device, &mut target);

    let first = encoder.encode(&mut backend, &pipeline).expect("first frame");
    let second = encoder.encode(&mut backend, &pipeline).expect("second frame");

    assert_ne!(first.view, second.view);
    assert_eq!(second.frame_index, 1);
}

#[test]
fn missing_vertex_entry_point_builds_nothing() {
    let Some(device) = headless_device("missing_vertex_entry_point_builds_nothing") else {
        return;
    };

    let shader = triangle(&device);
    let result = PipelineBuilder::new(&device).build(&shader, "missing", "fs", FORMAT);

    assert_eq!(
        result.err(),
        Some(PipelineBuildError::MissingEntryPoint {
            shader: "triangle".to_string(),
            stage: ShaderStage::Vertex,
            name: "missing".to_string(),
        })
    );
}

#[test]
fn depth_target_is_rejected() {
    let Some(device) = headless_device("depth_target_is_rejected") else {
        return;
    };

    let shader = triangle(&device);
    let result =
        PipelineBuilder::new(&device).build(&shader, "vs", "fs", wgpu::TextureFormat::Depth32Float);

    assert_eq!(
        result.err(),
        Some(PipelineBuildError::UnsupportedTargetFormat(wgpu::TextureFormat::Depth32Float))
    );
}

#[test]
fn rejected_source_reports_diagnostics() {
    let Some(device) = headless_device("rejected_source_reports_diagnostics") else {
        return;
    };

    let result = ShaderModule::compile(
        &device,
        "broken",
        "@vertex fn vs() -> @builtin(position) vec4f { return undefined_value; }",
        EntryPoints::new("vs", "fs"),
    );

    let err = result.err().expect("compile must fail");
    assert_eq!(err.label, "broken");
    assert!(err.diagnostics.contains("undefined_value"), "{}", err.diagnostics);
}

#[test]
fn offscreen_target_reports_its_format() {
    let Some(device) = headless_device("offscreen_target_reports_its_format") else {
        return;
    };

    let mut target = OffscreenTarget::new(&device, FORMAT, 8, 8);
    assert_eq!(target.target_format(), Some(FORMAT));

    let a = target.current_target_view().expect("view");
    let b = target.current_target_view().expect("view");
    assert_ne!(a.id(), b.id());
    assert_eq!(a.format(), FORMAT);
}

#[test]
fn frame_against_mismatched_pipeline_is_aborted() {
    let Some(device) = headless_device("frame_against_mismatched_pipeline_is_aborted") else {
        return;
    };

    let shader = triangle(&device);
    let pipeline = PipelineBuilder::new(&device)
        .build(&shader, "vs", "fs", wgpu::TextureFormat::Rgba8Unorm)
        .expect("pipeline builds");

    let mut target = OffscreenTarget::new(&device, FORMAT, 8, 8);
    let mut encoder = FrameEncoder::new();
    let mut backend = WgpuFrameBackend::new(&device, &mut target);

    let err = encoder.encode(&mut backend, &pipeline).unwrap_err();
    assert!(matches!(err, FrameError::FormatMismatch { .. }));
    assert_eq!(encoder.frames_submitted(), 0);
}

#[test]
fn frame_clears_to_grey_and_draws_red_triangle() {
    let Some(device) = headless_device("frame_clears_to_grey_and_draws_red_triangle") else {
        return;
    };

    let format = wgpu::TextureFormat::Rgba8Unorm;
    let shader = triangle(&device);
    let pipeline = PipelineBuilder::new(&device)
        .build(&shader, "vs", "fs", format)
        .expect("pipeline builds");

    let mut target = OffscreenTarget::new(&device, format, 64, 64);
    let mut encoder = FrameEncoder::new();
    {
        let mut backend = WgpuFrameBackend::new(&device, &mut target);
        encoder.encode(&mut backend, &pipeline).expect("frame encodes");
    }

    let (width, height) = target.size();
    let texture = target.last_texture().expect("frame acquired a texture");
    let pixels = read_rgba8(&device, texture, width, height);

    // 0.3 in unorm8 is 76.5; allow either rounding.
    for (x, y) in [(0, 0), (width - 1, 0), (0, height - 1), (width - 1, height - 1)] {
        let [r, g, b, a] = pixel(&pixels, width, x, y);
        for c in [r, g, b] {
            assert!((76..=77).contains(&c), "corner ({x}, {y}) = {:?}", [r, g, b, a]);
        }
        assert_eq!(a, 255);
    }

    assert_eq!(pixel(&pixels, width, width / 2, height / 2), [255, 0, 0, 255]);
}

#[test]
fn integer_target_format_is_an_error_not_a_panic() {
    let Some(device) = headless_device("integer_target_format_is_an_error_not_a_panic") else {
        return;
    };

    let shader = triangle(&device);
    let result =
        PipelineBuilder::new(&device).build(&shader, "vs", "fs", wgpu::TextureFormat::Rgba8Uint);

    assert!(
        matches!(
            result.as_ref().err(),
            Some(
                PipelineBuildError::IncompatibleTargetFormat { .. }
                    | PipelineBuildError::UnsupportedTargetFormat(_)
            )
        ),
        "unexpected result: {:?}",
        result.err()
    );
}
