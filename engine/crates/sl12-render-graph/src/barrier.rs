//! barrier 辅助函数
//!
//! 按解析结果把每个槽位从访问前的状态转换到本 Pass 需要的状态。
//! 状态相同的槽位不会生成 barrier。

use crate::allocator::{PassBindings, PassStates};
use crate::manager::{RenderResourceHandle, RenderResourceManager};
use sl12_gfx::commands::command_list::GfxCommandList;
use sl12_gfx::foundation::device::GfxDevice;
use sl12_gfx::resources::resource_state::GfxResourceStates;

impl RenderResourceManager {
    /// 输入资源转换到 SHADER_RESOURCE
    pub fn barrier_input_resources(&self, cmd: &mut dyn GfxCommandList, pass_no: usize) {
        let (states, bindings) = self.pass_plan(pass_no);
        for (handle, prev_state) in bindings.inputs().iter().zip(states.input_prev_states()) {
            self.transition(cmd, *handle, *prev_state, GfxResourceStates::SHADER_RESOURCE);
        }
    }

    /// 输出资源转换到写入状态，swapchain 从 PRESENT 转换到 RENDER_TARGET
    pub fn barrier_output_resources(&self, device: &dyn GfxDevice, cmd: &mut dyn GfxCommandList, pass_no: usize) {
        let (states, bindings) = self.pass_plan(pass_no);
        for (handle, prev_state) in bindings.outputs().iter().zip(states.output_prev_states()) {
            match handle {
                Some(handle) => self.transition_to_write(cmd, *handle, *prev_state),
                None if *prev_state == GfxResourceStates::PRESENT => match device.swapchain_texture() {
                    Some(texture) => {
                        cmd.transition_barrier(texture, GfxResourceStates::PRESENT, GfxResourceStates::RENDER_TARGET)
                    }
                    None => log::warn!("pass {} writes to the swapchain but the device has none", pass_no),
                },
                None => {}
            }
        }
    }

    /// 临时资源转换到写入状态
    pub fn barrier_temp_resources(&self, cmd: &mut dyn GfxCommandList, pass_no: usize) {
        let (states, bindings) = self.pass_plan(pass_no);
        for (handle, prev_state) in bindings.temps().iter().zip(states.temp_prev_states()) {
            self.transition_to_write(cmd, *handle, *prev_state);
        }
    }

    /// 依次处理输入、输出、临时资源
    pub fn barrier_all_resources(&self, device: &dyn GfxDevice, cmd: &mut dyn GfxCommandList, pass_no: usize) {
        self.barrier_input_resources(cmd, pass_no);
        self.barrier_output_resources(device, cmd, pass_no);
        self.barrier_temp_resources(cmd, pass_no);
    }
}

// tools
impl RenderResourceManager {
    fn pass_plan(&self, pass_no: usize) -> (&PassStates, &PassBindings) {
        let Some(plan) = self.plan() else {
            panic!("barrier requested for pass {} before make_resources succeeded", pass_no);
        };
        match (plan.pass_states(pass_no), plan.pass_bindings(pass_no)) {
            (Some(states), Some(bindings)) => (states, bindings),
            _ => panic!("pass {} is out of range, the plan has {} passes", pass_no, plan.pass_count()),
        }
    }

    fn transition_to_write(&self, cmd: &mut dyn GfxCommandList, handle: RenderResourceHandle, prev_state: GfxResourceStates) {
        if let Some(resource) = self.resource(handle) {
            self.transition(cmd, handle, prev_state, resource.write_state());
        }
    }

    fn transition(
        &self,
        cmd: &mut dyn GfxCommandList,
        handle: RenderResourceHandle,
        before: GfxResourceStates,
        after: GfxResourceStates,
    ) {
        if before == after {
            return;
        }
        if let Some(texture) = self.resource(handle).and_then(|resource| resource.texture()) {
            cmd.transition_barrier(texture, before, after);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use sl12_gfx::commands::barrier::GfxTransitionBarrier;
    use sl12_gfx::foundation::device::GfxDevice;
    use sl12_gfx::headless::{HeadlessCommandList, HeadlessDevice};

    const A: u16 = 1;
    const DEPTH: u16 = 2;

    fn color_desc() -> RenderResourceDesc {
        RenderResourceDesc::new().with_size(64, 64).with_format(GfxFormat::R8G8B8A8Unorm)
    }

    fn texture_of(manager: &RenderResourceManager, id: ResourceId) -> sl12_gfx::resources::handles::GfxTextureHandle {
        manager.render_resource(id).unwrap().texture().unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let mut device = HeadlessDevice::with_swapchain(64, 64);
        let mut cmd = HeadlessCommandList::new();
        let mut manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let producers = vec![
            ResourceProducer::new("p0").output_unique(A, color_desc()),
            ResourceProducer::new("p1").input_unique(A).output_swapchain(),
        ];
        manager.make_resources(&mut device, &producers).unwrap();
        let a = texture_of(&manager, ResourceId::unique(A));
        let swapchain = device.swapchain_texture().unwrap();

        manager.barrier_all_resources(&device, &mut cmd, 0);
        assert_eq!(
            cmd.take_barriers(),
            vec![GfxTransitionBarrier::new(a, GfxResourceStates::GENERIC_READ, GfxResourceStates::RENDER_TARGET)]
        );

        manager.barrier_all_resources(&device, &mut cmd, 1);
        assert_eq!(
            cmd.take_barriers(),
            vec![
                GfxTransitionBarrier::new(a, GfxResourceStates::RENDER_TARGET, GfxResourceStates::SHADER_RESOURCE),
                GfxTransitionBarrier::new(swapchain, GfxResourceStates::PRESENT, GfxResourceStates::RENDER_TARGET),
            ]
        );
        manager.destroy(&mut device);
    }

    #[test]
    fn test_swapchain_transitions_once() {
        let mut device = HeadlessDevice::with_swapchain(64, 64);
        let mut cmd = HeadlessCommandList::new();
        let mut manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let producers = vec![
            ResourceProducer::new("p0").output_swapchain(),
            ResourceProducer::new("p1").output_swapchain(),
        ];
        manager.make_resources(&mut device, &producers).unwrap();

        manager.barrier_output_resources(&device, &mut cmd, 0);
        assert_eq!(cmd.take_barriers().len(), 1);
        manager.barrier_output_resources(&device, &mut cmd, 1);
        assert!(cmd.barriers().is_empty());
        manager.destroy(&mut device);
    }

    #[test]
    fn test_no_barrier_when_state_matches() {
        let mut device = HeadlessDevice::new();
        let mut cmd = HeadlessCommandList::new();
        let mut manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let producers = vec![
            ResourceProducer::new("p0").output_unique(A, color_desc()),
            ResourceProducer::new("p1").input_unique(A),
            ResourceProducer::new("p2").input_unique(A),
        ];
        manager.make_resources(&mut device, &producers).unwrap();

        manager.barrier_input_resources(&mut cmd, 1);
        assert_eq!(cmd.take_barriers().len(), 1);
        manager.barrier_input_resources(&mut cmd, 2);
        assert!(cmd.barriers().is_empty());
        manager.destroy(&mut device);
    }

    #[test]
    fn test_depth_output_uses_depth_write() {
        let mut device = HeadlessDevice::new();
        let mut cmd = HeadlessCommandList::new();
        let mut manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let depth_desc = RenderResourceDesc::new().with_size(64, 64).with_format(GfxFormat::D32Float);
        let producers = vec![ResourceProducer::new("depth").output_unique(DEPTH, depth_desc)];
        manager.make_resources(&mut device, &producers).unwrap();

        manager.barrier_output_resources(&device, &mut cmd, 0);
        let depth = texture_of(&manager, ResourceId::unique(DEPTH));
        assert_eq!(
            cmd.barriers(),
            &[GfxTransitionBarrier::new(depth, GfxResourceStates::GENERIC_READ, GfxResourceStates::DEPTH_WRITE)]
        );
        manager.destroy(&mut device);
    }

    #[test]
    fn test_temp_barriers() {
        let mut device = HeadlessDevice::new();
        let mut cmd = HeadlessCommandList::new();
        let mut manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let uav_desc = color_desc().with_target_count(0).with_uav_count(1);
        let producers = vec![ResourceProducer::new("blur").temp(uav_desc)];
        manager.make_resources(&mut device, &producers).unwrap();

        manager.barrier_all_resources(&device, &mut cmd, 0);
        let temp = texture_of(&manager, ResourceId::temporal(0, 0));
        assert_eq!(
            cmd.barriers(),
            &[GfxTransitionBarrier::new(temp, GfxResourceStates::GENERIC_READ, GfxResourceStates::UNORDERED_ACCESS)]
        );
        manager.destroy(&mut device);
    }

    #[test]
    #[should_panic(expected = "before make_resources")]
    fn test_barrier_without_plan_panics() {
        let manager = RenderResourceManager::new(RenderResourceSettings::default()).unwrap();
        let mut cmd = HeadlessCommandList::new();
        manager.barrier_input_resources(&mut cmd, 0);
    }
}
