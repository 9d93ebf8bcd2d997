//! Pass 的资源声明
//!
//! 每个 Pass 声明自己读取的输入、写入的输出（附带资源描述）以及只在本 Pass 内使用的临时资源。
//! 声明本身不会被管理器修改，解析结果通过 [`crate::ResolvedGraph`] 和 [`crate::FramePlan`] 返回。

use crate::render_resource_desc::RenderResourceDesc;
use crate::resource_id::ResourceId;

/// 输入来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// 直接引用具体 ID
    Id(ResourceId),
    /// 上一个 Pass 的第 N 个输出
    PrevOutput(usize),
}

/// 输出目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// 直接写入具体 ID
    Id(ResourceId),
    /// 匿名输出，由下一个 Pass 通过 [`InputSource::PrevOutput`] 读取
    NextPass,
    /// swapchain back buffer
    Swapchain,
}

/// 一个输出槽位
#[derive(Clone, Copy, Debug)]
pub struct ProducerOutput {
    pub target: OutputTarget,
    /// swapchain 输出忽略此描述
    pub desc: RenderResourceDesc,
}

/// 一个 Pass 的资源声明
#[derive(Clone, Debug)]
pub struct ResourceProducer {
    name: String,
    inputs: Vec<InputSource>,
    outputs: Vec<ProducerOutput>,
    temps: Vec<RenderResourceDesc>,
}

// new & builder
impl ResourceProducer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            temps: Vec::new(),
        }
    }

    /// 读取具体 ID
    #[inline]
    pub fn input(mut self, id: ResourceId) -> Self {
        self.inputs.push(InputSource::Id(id));
        self
    }

    #[inline]
    pub fn input_unique(self, id: u16) -> Self {
        self.input(ResourceId::unique(id))
    }

    /// 读取 `history_offset` 帧之前写入的版本
    #[inline]
    pub fn input_unique_history(self, id: u16, history_offset: u8) -> Self {
        self.input(ResourceId::unique_with_history(id, history_offset))
    }

    /// 读取上一个 Pass 的第 `prev_output_index` 个输出
    #[inline]
    pub fn input_from_prev_output(mut self, prev_output_index: usize) -> Self {
        self.inputs.push(InputSource::PrevOutput(prev_output_index));
        self
    }

    /// 写入具体 ID
    #[inline]
    pub fn output(mut self, id: ResourceId, desc: RenderResourceDesc) -> Self {
        self.outputs.push(ProducerOutput {
            target: OutputTarget::Id(id),
            desc,
        });
        self
    }

    #[inline]
    pub fn output_unique(self, id: u16, desc: RenderResourceDesc) -> Self {
        self.output(ResourceId::unique(id), desc)
    }

    #[inline]
    pub fn output_unique_history(self, id: u16, history_offset: u8, desc: RenderResourceDesc) -> Self {
        self.output(ResourceId::unique_with_history(id, history_offset), desc)
    }

    /// 匿名输出，只供下一个 Pass 读取
    #[inline]
    pub fn output_for_next_pass(mut self, desc: RenderResourceDesc) -> Self {
        self.outputs.push(ProducerOutput {
            target: OutputTarget::NextPass,
            desc,
        });
        self
    }

    #[inline]
    pub fn output_swapchain(mut self) -> Self {
        self.outputs.push(ProducerOutput {
            target: OutputTarget::Swapchain,
            desc: RenderResourceDesc::default(),
        });
        self
    }

    /// 只在本 Pass 内使用的临时资源
    #[inline]
    pub fn temp(mut self, desc: RenderResourceDesc) -> Self {
        self.temps.push(desc);
        self
    }
}

// setters
impl ResourceProducer {
    /// 替换第 `index` 个输入
    ///
    /// # Panics
    /// `index` 越界
    pub fn set_input(&mut self, index: usize, source: InputSource) {
        assert!(index < self.inputs.len(), "{}: input index {} out of range", self.name, index);
        self.inputs[index] = source;
    }

    /// 替换第 `index` 个输出
    ///
    /// # Panics
    /// `index` 越界
    pub fn set_output(&mut self, index: usize, target: OutputTarget, desc: RenderResourceDesc) {
        assert!(index < self.outputs.len(), "{}: output index {} out of range", self.name, index);
        self.outputs[index] = ProducerOutput { target, desc };
    }

    /// 替换第 `index` 个临时资源
    ///
    /// # Panics
    /// `index` 越界
    pub fn set_temp(&mut self, index: usize, desc: RenderResourceDesc) {
        assert!(index < self.temps.len(), "{}: temp index {} out of range", self.name, index);
        self.temps[index] = desc;
    }
}

// getters
impl ResourceProducer {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn inputs(&self) -> &[InputSource] {
        &self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[ProducerOutput] {
        &self.outputs
    }

    #[inline]
    pub fn temps(&self) -> &[RenderResourceDesc] {
        &self.temps
    }
}
