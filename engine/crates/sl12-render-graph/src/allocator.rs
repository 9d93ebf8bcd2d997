//! 分配与状态解析
//!
//! 按 Pass 顺序维护两个集合：
//! - `used`：仍会被后续 Pass 访问、或仍需保留历史帧的资源
//! - `unused`：已经退役、可以被描述相同的新请求复用的资源
//!
//! 每个 Pass 依次处理输入、输出、临时资源，记录每个槽位在本 Pass 之前的状态，
//! 处理完后把最后访问已过且历史帧已保留够的资源移入 `unused`。

use crate::error::{GraphError, GraphResult};
use crate::lifetime::ResolvedGraph;
use crate::manager::RenderResourceHandle;
use crate::render_resource::RenderResource;
use crate::render_resource_desc::RenderResourceDesc;
use crate::resource_id::{ResourceId, ResourceRef};
use crate::settings::RenderResourceSettings;
use itertools::Itertools;
use sl12_gfx::foundation::device::GfxDevice;
use sl12_gfx::resources::resource_state::GfxResourceStates;
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// 每个槽位在 Pass 执行前的资源状态，即 barrier 的源状态
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStates {
    input_prev_states: Vec<GfxResourceStates>,
    output_prev_states: Vec<GfxResourceStates>,
    temp_prev_states: Vec<GfxResourceStates>,
}

impl PassStates {
    #[inline]
    pub fn input_prev_states(&self) -> &[GfxResourceStates] {
        &self.input_prev_states
    }

    #[inline]
    pub fn output_prev_states(&self) -> &[GfxResourceStates] {
        &self.output_prev_states
    }

    #[inline]
    pub fn temp_prev_states(&self) -> &[GfxResourceStates] {
        &self.temp_prev_states
    }
}

/// 每个槽位绑定的物理资源
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassBindings {
    inputs: Vec<RenderResourceHandle>,
    /// swapchain 输出为 None
    outputs: Vec<Option<RenderResourceHandle>>,
    temps: Vec<RenderResourceHandle>,
}

impl PassBindings {
    #[inline]
    pub fn inputs(&self) -> &[RenderResourceHandle] {
        &self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[Option<RenderResourceHandle>] {
        &self.outputs
    }

    #[inline]
    pub fn temps(&self) -> &[RenderResourceHandle] {
        &self.temps
    }
}

/// 一次解析的完整结果
#[derive(Clone, Debug)]
pub struct FramePlan {
    graph: ResolvedGraph,
    states: Vec<PassStates>,
    bindings: Vec<PassBindings>,
    /// 本次解析中每个 ID 绑定的物理资源
    resource_map: BTreeMap<ResourceId, RenderResourceHandle>,
    created_resource_count: usize,
}

// getters
impl FramePlan {
    #[inline]
    pub fn graph(&self) -> &ResolvedGraph {
        &self.graph
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn pass_states(&self, pass_no: usize) -> Option<&PassStates> {
        self.states.get(pass_no)
    }

    #[inline]
    pub fn pass_bindings(&self, pass_no: usize) -> Option<&PassBindings> {
        self.bindings.get(pass_no)
    }

    #[inline]
    pub fn resource_handle(&self, id: ResourceId) -> Option<RenderResourceHandle> {
        self.resource_map.get(&id).copied()
    }

    /// 本次解析绑定过的全部 ID
    #[inline]
    pub fn bound_ids(&self) -> impl Iterator<Item = (ResourceId, RenderResourceHandle)> + '_ {
        self.resource_map.iter().map(|(id, handle)| (*id, *handle))
    }

    /// 本次解析新创建的物理资源数量
    #[inline]
    pub fn created_resource_count(&self) -> usize {
        self.created_resource_count
    }
}

/// 在 `resources` 上执行分配，新建的资源追加到 `resources` 中
pub(crate) fn allocate(
    device: &mut dyn GfxDevice,
    resources: &mut SlotMap<RenderResourceHandle, RenderResource>,
    settings: &RenderResourceSettings,
    graph: ResolvedGraph,
) -> GraphResult<FramePlan> {
    let mut allocator = ResourceAllocator {
        device,
        resources,
        settings,
        graph: &graph,
        used: BTreeMap::new(),
        unused: Vec::new(),
        swapchain_state: None,
        resource_map: BTreeMap::new(),
        created_resource_count: 0,
    };
    allocator.seed_history();

    let mut states = Vec::with_capacity(graph.pass_count());
    let mut bindings = Vec::with_capacity(graph.pass_count());
    for pass_no in 0..graph.pass_count() {
        let (pass_states, pass_bindings) = allocator.allocate_pass(pass_no)?;
        states.push(pass_states);
        bindings.push(pass_bindings);
    }

    let resource_map = std::mem::take(&mut allocator.resource_map);
    let created_resource_count = allocator.created_resource_count;
    Ok(FramePlan {
        graph,
        states,
        bindings,
        resource_map,
        created_resource_count,
    })
}

struct ResourceAllocator<'a> {
    device: &'a mut dyn GfxDevice,
    resources: &'a mut SlotMap<RenderResourceHandle, RenderResource>,
    settings: &'a RenderResourceSettings,
    graph: &'a ResolvedGraph,

    used: BTreeMap<ResourceId, RenderResourceHandle>,
    unused: Vec<RenderResourceHandle>,
    /// swapchain 在本次解析中的状态，首次写入前为 None
    swapchain_state: Option<GfxResourceStates>,

    resource_map: BTreeMap<ResourceId, RenderResourceHandle>,
    created_resource_count: usize,
}

impl ResourceAllocator<'_> {
    /// 仍需保留历史帧的资源以"再老一帧"的 ID 进入 used，其余资源全部进入 unused
    fn seed_history(&mut self) {
        for (handle, resource) in self.resources.iter_mut() {
            let carried_id = if resource.is_history_end() {
                None
            } else {
                resource.last_id().and_then(|id| id.next_history())
            };

            match carried_id {
                Some(id) if !self.used.contains_key(&id) => {
                    resource.increment_history();
                    resource.set_last_id(id);
                    log::debug!("history {:?} carried over ({}/{})", id, resource.history(), resource.history_max());
                    self.used.insert(id, handle);
                    self.resource_map.insert(id, handle);
                }
                _ => {
                    resource.end_history();
                    self.unused.push(handle);
                }
            }
        }
    }

    fn allocate_pass(&mut self, pass_no: usize) -> GraphResult<(PassStates, PassBindings)> {
        let graph = self.graph;
        let pass = &graph.passes()[pass_no];
        let mut states = PassStates::default();
        let mut bindings = PassBindings::default();

        for id in pass.inputs() {
            let (handle, prev_state) = self.read_input(pass_no, *id)?;
            states.input_prev_states.push(prev_state);
            bindings.inputs.push(handle);
        }

        for (output, desc) in pass.outputs().iter().zip_eq(pass.output_descs()) {
            let (handle, prev_state) = self.write_output(*output, desc)?;
            states.output_prev_states.push(prev_state);
            bindings.outputs.push(handle);
        }

        for (id, desc) in pass.temps().iter().zip_eq(pass.temp_descs()) {
            let (handle, prev_state) = self.write_managed(*id, desc, 0)?;
            states.temp_prev_states.push(prev_state);
            bindings.temps.push(handle);
        }

        self.retire(pass_no);
        Ok((states, bindings))
    }

    fn read_input(&mut self, pass_no: usize, id: ResourceId) -> GraphResult<(RenderResourceHandle, GfxResourceStates)> {
        let handle = match self.used.get(&id) {
            Some(handle) => *handle,
            // 尚未写入过的历史资源：按当前帧写入它的描述分配一个
            None if id.history_offset() > 0 => {
                let desc = self
                    .graph
                    .find_desc_for_history_buffer(id)
                    .ok_or(GraphError::HistoryDescriptorNotFound { pass_no, id })?;
                if desc.history_max < u32::from(id.history_offset()) {
                    log::warn!("pass {} reads {:?} beyond its history_max {}", pass_no, id, desc.history_max);
                }
                let handle = self.acquire(id, &desc)?;
                self.stamp(handle, id, desc.history_max);
                handle
            }
            None => return Err(GraphError::UnproducedInput { pass_no, id }),
        };

        let resource = &mut self.resources[handle];
        let prev_state = resource.state();
        resource.set_state(GfxResourceStates::SHADER_RESOURCE);
        Ok((handle, prev_state))
    }

    fn write_output(
        &mut self,
        output: ResourceRef,
        desc: &RenderResourceDesc,
    ) -> GraphResult<(Option<RenderResourceHandle>, GfxResourceStates)> {
        match output {
            // swapchain 第一次被写入时认为处于 PRESENT 状态
            ResourceRef::Swapchain => {
                let prev_state = self.swapchain_state.unwrap_or(GfxResourceStates::PRESENT);
                self.swapchain_state = Some(GfxResourceStates::RENDER_TARGET);
                Ok((None, prev_state))
            }
            ResourceRef::Managed(id) => {
                let history_max = if id.is_unique() { desc.history_max } else { 0 };
                let (handle, prev_state) = self.write_managed(id, desc, history_max)?;
                Ok((Some(handle), prev_state))
            }
        }
    }

    fn write_managed(
        &mut self,
        id: ResourceId,
        desc: &RenderResourceDesc,
        history_max: u32,
    ) -> GraphResult<(RenderResourceHandle, GfxResourceStates)> {
        let handle = match self.used.get(&id) {
            Some(handle) => {
                if !self.resources[*handle].is_same_desc(desc) {
                    log::warn!("{:?} is written again with a different descriptor; keeping the live resource", id);
                }
                *handle
            }
            None => {
                let handle = self.acquire(id, desc)?;
                self.stamp(handle, id, history_max);
                handle
            }
        };

        let resource = &mut self.resources[handle];
        let prev_state = resource.state();
        resource.set_state(resource.write_state());
        Ok((handle, prev_state))
    }

    /// 复用描述相同的空闲资源，没有则新建
    fn acquire(&mut self, id: ResourceId, desc: &RenderResourceDesc) -> GraphResult<RenderResourceHandle> {
        let resources = &*self.resources;
        if let Some(pos) = self.unused.iter().position(|handle| resources[*handle].is_same_desc(desc)) {
            let handle = self.unused.remove(pos);
            log::debug!("{:?} reuses {:?}", id, handle);
            return Ok(handle);
        }

        let resource = RenderResource::new(
            self.device,
            desc,
            self.settings.screen_width,
            self.settings.screen_height,
            self.settings.fresh_resource_state,
        )
        .map_err(|e| e.for_resource(id))?;
        let handle = self.resources.insert(resource);
        self.created_resource_count += 1;
        log::debug!("{:?} creates {:?} ({}, {}x{})", id, handle, desc.format, desc.width, desc.height);
        Ok(handle)
    }

    /// 绑定 ID 并设置历史帧信息
    fn stamp(&mut self, handle: RenderResourceHandle, id: ResourceId, history_max: u32) {
        let resource = &mut self.resources[handle];
        resource.set_history_max(history_max);
        resource.set_history(u32::from(id.history_offset()));
        resource.set_last_id(id);

        self.used.insert(id, handle);
        self.resource_map.insert(id, handle);
    }

    /// 最后访问已过、历史帧已保留够的资源移入 unused
    fn retire(&mut self, pass_no: usize) {
        let graph = self.graph;
        let resources = &*self.resources;
        let retired = self
            .used
            .iter()
            .filter(|(id, handle)| {
                let last_access_passed = graph.last_access(**id).is_none_or(|last| last <= pass_no);
                last_access_passed && resources[**handle].is_history_end()
            })
            .map(|(id, _)| *id)
            .collect_vec();

        for id in retired {
            if let Some(handle) = self.used.remove(&id) {
                self.unused.push(handle);
            }
        }
    }
}
