//! deferred 光照 + 屏幕空间水面的示例帧
//!
//! 8 个 Pass：GBuffer、LinearDepth、Lighting、Hash、ResolveHash、TemporalReprojection、Water、Blur。
//! TemporalReprojection 读取上一帧的 WaterResult，因此 WaterResult 保留 1 帧历史。
//! 在 headless 后端上逐帧解析并录制 barrier。

use crate::config::DeferredWaterConfig;
use sl12_gfx::commands::command_list::GfxCommandList;
use sl12_gfx::foundation::device::GfxDevice;
use sl12_gfx::headless::{HeadlessCommandList, HeadlessDevice};
use sl12_render_graph::{
    GfxFormat, GfxResourceStates, RenderResourceDesc, RenderResourceManager, RenderResourceSettings, ResourceProducer,
};

/// 示例帧使用的逻辑资源 ID
pub mod render_id {
    pub const GBUFFER0: u16 = 0;
    pub const GBUFFER1: u16 = 1;
    pub const GBUFFER2: u16 = 2;
    pub const DEPTH: u16 = 3;
    pub const LIGHT_RESULT: u16 = 4;
    pub const LINEAR_DEPTH: u16 = 5;
    pub const HASH_BUFFER: u16 = 6;
    pub const WATER_RESULT: u16 = 7;
}

pub const BLUR_PASS: &str = "Blur";

/// 单帧的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame_index: u32,
    pub pass_count: usize,
    /// 管理器持有的物理资源数量
    pub resource_count: usize,
    /// 本帧新建的物理资源数量
    pub created_resource_count: usize,
    pub barrier_count: usize,
}

/// 构建示例帧的 Pass 列表
pub fn build_producers(config: &DeferredWaterConfig) -> Vec<ResourceProducer> {
    use render_id::*;

    let gbuffer0 = RenderResourceDesc::new().with_format(GfxFormat::R16G16B16A16Float);
    let gbuffer1 = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8UnormSrgb);
    let gbuffer2 = RenderResourceDesc::new().with_format(GfxFormat::R8G8B8A8Unorm);
    let depth = RenderResourceDesc::new().with_format(GfxFormat::D32Float);
    let light_result = RenderResourceDesc::new().with_format(GfxFormat::R16G16B16A16Float).with_uav_count(1);
    let linear_depth = RenderResourceDesc::new().with_format(GfxFormat::R32Float);
    let blur_x = RenderResourceDesc::new().with_format(GfxFormat::R16G16B16A16Float);
    let hash = RenderResourceDesc::new().with_format(GfxFormat::R32Uint).with_uav_count(1);
    let water = RenderResourceDesc::new().with_format(GfxFormat::R16G16B16A16Float).with_history_max(1);

    let mut producers = vec![
        ResourceProducer::new("GBuffer")
            .output_unique(GBUFFER0, gbuffer0)
            .output_unique(GBUFFER1, gbuffer1)
            .output_unique(GBUFFER2, gbuffer2)
            .output_unique(DEPTH, depth),
        ResourceProducer::new("LinearDepth").input_unique(DEPTH).output_unique(LINEAR_DEPTH, linear_depth),
        ResourceProducer::new("Lighting")
            .input_unique(GBUFFER0)
            .input_unique(GBUFFER1)
            .input_unique(GBUFFER2)
            .input_unique(LINEAR_DEPTH)
            .output_unique(LIGHT_RESULT, light_result),
    ];

    if config.enable_water {
        producers.extend([
            ResourceProducer::new("Hash").input_unique(LINEAR_DEPTH).output_unique(HASH_BUFFER, hash),
            ResourceProducer::new("ResolveHash")
                .input_unique(LIGHT_RESULT)
                .input_unique(HASH_BUFFER)
                .output_unique(WATER_RESULT, water),
            ResourceProducer::new("TemporalReprojection")
                .input_unique_history(WATER_RESULT, 1)
                .input_unique(HASH_BUFFER)
                .output_unique(WATER_RESULT, water),
            ResourceProducer::new("Water")
                .input_unique(WATER_RESULT)
                .output_unique(LIGHT_RESULT, light_result)
                .output_unique(DEPTH, depth),
        ]);
    }

    let mut blur = ResourceProducer::new(BLUR_PASS)
        .input_unique(LIGHT_RESULT)
        .input_unique(LINEAR_DEPTH)
        .output_swapchain();
    if config.enable_blur_temp {
        blur = blur.temp(blur_x);
    }
    producers.push(blur);

    producers
}

/// 在 headless 后端上连续运行 `frame_count` 帧
pub fn run(config: &DeferredWaterConfig) -> anyhow::Result<Vec<FrameReport>> {
    let mut device = HeadlessDevice::with_swapchain(config.screen_width, config.screen_height);
    let settings = RenderResourceSettings::default().with_screen_size(config.screen_width, config.screen_height);
    let mut manager = RenderResourceManager::new(settings)?;
    let producers = build_producers(config);

    let reports = run_frames(&mut device, &mut manager, &producers, config);
    manager.destroy(&mut device);
    reports
}

fn run_frames(
    device: &mut HeadlessDevice,
    manager: &mut RenderResourceManager,
    producers: &[ResourceProducer],
    config: &DeferredWaterConfig,
) -> anyhow::Result<Vec<FrameReport>> {
    let mut cmd = HeadlessCommandList::new();
    let mut reports = Vec::with_capacity(config.frame_count as usize);

    for frame_index in 0..config.frame_count {
        manager.make_resources(device, producers)?;
        if frame_index == 0 && config.log_plan {
            manager.print_resource_plan();
        }

        for (pass_no, producer) in producers.iter().enumerate() {
            manager.barrier_all_resources(&*device, &mut cmd, pass_no);
            if producer.name() == BLUR_PASS && !producer.temps().is_empty() {
                blur_temp_to_shader_resource(manager, &mut cmd, pass_no);
            }
        }

        if let Some(swapchain) = device.swapchain_texture() {
            cmd.transition_barrier(swapchain, GfxResourceStates::RENDER_TARGET, GfxResourceStates::PRESENT);
        }

        let report = FrameReport {
            frame_index,
            pass_count: producers.len(),
            resource_count: manager.resource_count(),
            created_resource_count: manager.plan().map(|plan| plan.created_resource_count()).unwrap_or_default(),
            barrier_count: cmd.take_barriers().len(),
        };
        log::info!(
            "frame {}: {} passes, {} resources ({} new), {} barriers",
            report.frame_index,
            report.pass_count,
            report.resource_count,
            report.created_resource_count,
            report.barrier_count
        );
        reports.push(report);
    }

    Ok(reports)
}

/// Blur 的 X 方向写入临时资源，Y 方向再把它作为输入读取
///
/// 这次转换不在解析结果中，需要手动更新资源状态，下一帧的前置状态才正确。
fn blur_temp_to_shader_resource(manager: &mut RenderResourceManager, cmd: &mut dyn GfxCommandList, pass_no: usize) {
    let Some(temp_id) = manager.resolved_pass(pass_no).map(|pass| pass.temp_id(0)) else {
        return;
    };
    let Some(temp) = manager.render_resource_mut(temp_id) else {
        log::warn!("blur temp {:?} has no render resource", temp_id);
        return;
    };

    if let Some(texture) = temp.texture() {
        cmd.transition_barrier(texture, temp.state(), GfxResourceStates::SHADER_RESOURCE);
    }
    temp.set_state(GfxResourceStates::SHADER_RESOURCE);
}
