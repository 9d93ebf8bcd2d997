//! 渲染资源管理器
//!
//! 持有全部物理资源（只增不减，直到 `reset`/`destroy`），
//! 每次 `make_resources` 重新解析 Pass 列表并生成 [`FramePlan`]。

use crate::allocator::{FramePlan, PassStates, allocate};
use crate::error::{GraphError, GraphResult};
use crate::lifetime::{ResolvedPass, resolve_producers};
use crate::producer::ResourceProducer;
use crate::render_resource::RenderResource;
use crate::resource_id::{ResourceId, ResourceRef};
use crate::settings::RenderResourceSettings;
use itertools::Itertools;
use sl12_gfx::foundation::device::GfxDevice;
use sl12_gfx::resources::resource_state::GfxResourceStates;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

new_key_type! {
    /// 物理资源在管理器中的句柄
    pub struct RenderResourceHandle;
}

/// 渲染资源管理器
pub struct RenderResourceManager {
    settings: RenderResourceSettings,

    /// 创建过的全部物理资源
    resources: SlotMap<RenderResourceHandle, RenderResource>,
    /// 最近一次成功解析的结果
    plan: Option<FramePlan>,

    /// 成功解析的次数
    resolve_count: u64,
}

// new & init
impl RenderResourceManager {
    pub fn new(settings: RenderResourceSettings) -> GraphResult<Self> {
        Self::check_screen_size(settings.screen_width, settings.screen_height)?;
        log::info!(
            "RenderResourceManager created: screen {}x{}, fresh state {}",
            settings.screen_width,
            settings.screen_height,
            settings.fresh_resource_state
        );
        Ok(Self {
            settings,
            resources: SlotMap::with_key(),
            plan: None,
            resolve_count: 0,
        })
    }

    fn check_screen_size(width: u32, height: u32) -> GraphResult<()> {
        if width == 0 || height == 0 {
            return Err(GraphError::InvalidScreenSize { width, height });
        }
        Ok(())
    }

    /// 修改屏幕尺寸
    ///
    /// 按比例缩放的资源尺寸会变化，因此释放全部资源，下一次 `make_resources` 重新创建。
    pub fn resize(&mut self, device: &mut dyn GfxDevice, width: u32, height: u32) -> GraphResult<()> {
        Self::check_screen_size(width, height)?;
        if (width, height) == (self.settings.screen_width, self.settings.screen_height) {
            return Ok(());
        }

        log::info!(
            "RenderResourceManager resize: {}x{} -> {}x{}",
            self.settings.screen_width,
            self.settings.screen_height,
            width,
            height
        );
        self.reset(device);
        self.settings.screen_width = width;
        self.settings.screen_height = height;
        Ok(())
    }
}

// resolve
impl RenderResourceManager {
    /// 解析 Pass 列表，分配物理资源并计算每个槽位的前置状态
    ///
    /// 可以每帧调用：仍需保留历史帧的资源会延续到下一次解析。
    /// 失败时不保留任何解析结果，资源状态回退到调用前，历史帧不再延续。
    pub fn make_resources(&mut self, device: &mut dyn GfxDevice, producers: &[ResourceProducer]) -> GraphResult<()> {
        self.plan = None;
        let graph = resolve_producers(producers)?;

        let saved_states: SecondaryMap<RenderResourceHandle, _> =
            self.resources.iter().map(|(handle, resource)| (handle, resource.state())).collect();

        match allocate(device, &mut self.resources, &self.settings, graph) {
            Ok(plan) => {
                self.resolve_count += 1;
                log::debug!(
                    "resolve #{}: {} passes, {} resources ({} new)",
                    self.resolve_count,
                    plan.pass_count(),
                    self.resources.len(),
                    plan.created_resource_count()
                );
                self.plan = Some(plan);
                Ok(())
            }
            Err(e) => {
                log::error!("make_resources failed: {}", e);
                for (handle, resource) in self.resources.iter_mut() {
                    let state = saved_states.get(handle).copied().unwrap_or(self.settings.fresh_resource_state);
                    resource.set_state(state);
                    resource.end_history();
                }
                Err(e)
            }
        }
    }
}

// destroy
impl RenderResourceManager {
    /// 释放全部物理资源
    pub fn reset(&mut self, device: &mut dyn GfxDevice) {
        for resource in self.resources.values_mut() {
            resource.destroy(device);
        }
        self.resources.clear();
        self.plan = None;
    }

    pub fn destroy(&mut self, device: &mut dyn GfxDevice) {
        log::info!("RenderResourceManager destroy: {} resources", self.resources.len());
        self.reset(device);
    }
}

impl Drop for RenderResourceManager {
    fn drop(&mut self) {
        debug_assert!(
            self.resources.is_empty() || std::thread::panicking(),
            "RenderResourceManager dropped with {} live resources, call destroy() first",
            self.resources.len()
        );
    }
}

// getters
impl RenderResourceManager {
    #[inline]
    pub fn settings(&self) -> &RenderResourceSettings {
        &self.settings
    }

    /// 管理器持有的物理资源数量
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn resolve_count(&self) -> u64 {
        self.resolve_count
    }

    #[inline]
    pub fn plan(&self) -> Option<&FramePlan> {
        self.plan.as_ref()
    }

    #[inline]
    pub fn resolved_pass(&self, pass_no: usize) -> Option<&ResolvedPass> {
        self.plan.as_ref().and_then(|plan| plan.graph().pass(pass_no))
    }

    #[inline]
    pub fn pass_states(&self, pass_no: usize) -> Option<&PassStates> {
        self.plan.as_ref().and_then(|plan| plan.pass_states(pass_no))
    }

    /// 逻辑 ID 在最近一次解析中绑定的物理资源句柄
    #[inline]
    pub fn render_resource_handle(&self, id: impl Into<ResourceRef>) -> Option<RenderResourceHandle> {
        let id = id.into().managed()?;
        self.plan.as_ref().and_then(|plan| plan.resource_handle(id))
    }

    /// 逻辑 ID 在最近一次解析中绑定的物理资源，swapchain 返回 None
    #[inline]
    pub fn render_resource(&self, id: impl Into<ResourceRef>) -> Option<&RenderResource> {
        self.render_resource_handle(id).and_then(|handle| self.resources.get(handle))
    }

    #[inline]
    pub fn render_resource_mut(&mut self, id: impl Into<ResourceRef>) -> Option<&mut RenderResource> {
        self.render_resource_handle(id).and_then(|handle| self.resources.get_mut(handle))
    }

    #[inline]
    pub fn resource(&self, handle: RenderResourceHandle) -> Option<&RenderResource> {
        self.resources.get(handle)
    }

    #[inline]
    pub fn iter_resources(&self) -> impl Iterator<Item = (RenderResourceHandle, &RenderResource)> {
        self.resources.iter()
    }
}

// debug
impl RenderResourceManager {
    /// 打印最近一次解析的结果
    pub fn print_resource_plan(&self) {
        let Some(plan) = &self.plan else {
            log::info!("RenderResourceManager: no resolved plan");
            return;
        };

        log::info!("╔══════════════════════════════════════════════════════════════════╗");
        log::info!("║              Render Resource Plan                                ║");
        log::info!("╠══════════════════════════════════════════════════════════════════╣");
        log::info!(
            "║ Resolve #{}  |  Passes: {}  |  Resources: {} ({} new)",
            self.resolve_count,
            plan.pass_count(),
            self.resources.len(),
            plan.created_resource_count()
        );
        log::info!(
            "║ Order: [{}]",
            plan.graph().passes().iter().map(|pass| pass.name()).join(" → ")
        );
        log::info!("╚══════════════════════════════════════════════════════════════════╝");

        for (pass_no, pass) in plan.graph().passes().iter().enumerate() {
            let (Some(states), Some(bindings)) = (plan.pass_states(pass_no), plan.pass_bindings(pass_no)) else {
                continue;
            };

            log::info!("");
            log::info!("┌─────────────────────────────────────────────────────────────────┐");
            log::info!("│ [{}/{}] Pass: \"{}\"", pass_no + 1, plan.pass_count(), pass.name());
            log::info!("├─────────────────────────────────────────────────────────────────┤");

            if !pass.inputs().is_empty() {
                log::info!("│ Inputs:");
                for ((id, handle), prev) in pass.inputs().iter().zip(bindings.inputs()).zip(states.input_prev_states()) {
                    log::info!(
                        "│   📖 {:?} -> {} ({} → {})",
                        id,
                        self.describe(*handle),
                        prev,
                        GfxResourceStates::SHADER_RESOURCE
                    );
                }
            }

            if !pass.outputs().is_empty() {
                log::info!("│ Outputs:");
                for ((id, handle), prev) in
                    pass.outputs().iter().zip(bindings.outputs()).zip(states.output_prev_states())
                {
                    let (target, write_state) = match handle {
                        Some(handle) => (self.describe(*handle), self.write_state_of(*handle)),
                        None => ("<swapchain>".to_string(), GfxResourceStates::RENDER_TARGET),
                    };
                    log::info!("│   ✏️  {:?} -> {} ({} → {})", id, target, prev, write_state);
                }
            }

            if !pass.temps().is_empty() {
                log::info!("│ Temps:");
                for ((id, handle), prev) in pass.temps().iter().zip(bindings.temps()).zip(states.temp_prev_states()) {
                    log::info!(
                        "│   🧪 {:?} -> {} ({} → {})",
                        id,
                        self.describe(*handle),
                        prev,
                        self.write_state_of(*handle)
                    );
                }
            }

            log::info!("└─────────────────────────────────────────────────────────────────┘");
        }
    }

    fn describe(&self, handle: RenderResourceHandle) -> String {
        match self.resources.get(handle) {
            Some(resource) => {
                format!("{:?} {} {}x{}", handle, resource.desc().format, resource.width(), resource.height())
            }
            None => "<unknown>".to_string(),
        }
    }

    fn write_state_of(&self, handle: RenderResourceHandle) -> GfxResourceStates {
        self.resources.get(handle).map(|resource| resource.write_state()).unwrap_or_default()
    }
}
