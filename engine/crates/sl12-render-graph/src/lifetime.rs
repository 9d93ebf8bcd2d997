//! 生命周期分析
//!
//! 按 Pass 顺序把相对引用解析成具体 ID，并记录每个 ID 最后一次被访问的 Pass。
//! 分配阶段依据这个信息判断物理资源何时可以交给后续 Pass 复用。

use crate::error::{GraphError, GraphResult};
use crate::producer::{InputSource, OutputTarget, ResourceProducer};
use crate::render_resource_desc::RenderResourceDesc;
use crate::resource_id::{ResourceId, ResourceRef};
use itertools::Itertools;
use std::collections::BTreeMap;

/// 解析后的 Pass：所有槽位都是具体 ID
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPass {
    name: String,
    inputs: Vec<ResourceId>,
    outputs: Vec<ResourceRef>,
    output_descs: Vec<RenderResourceDesc>,
    temps: Vec<ResourceId>,
    temp_descs: Vec<RenderResourceDesc>,
}

// getters
impl ResolvedPass {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn inputs(&self) -> &[ResourceId] {
        &self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[ResourceRef] {
        &self.outputs
    }

    #[inline]
    pub fn output_descs(&self) -> &[RenderResourceDesc] {
        &self.output_descs
    }

    #[inline]
    pub fn temps(&self) -> &[ResourceId] {
        &self.temps
    }

    #[inline]
    pub fn temp_descs(&self) -> &[RenderResourceDesc] {
        &self.temp_descs
    }

    #[inline]
    pub fn input_id(&self, index: usize) -> ResourceId {
        self.inputs[index]
    }

    #[inline]
    pub fn output_id(&self, index: usize) -> ResourceRef {
        self.outputs[index]
    }

    #[inline]
    pub fn temp_id(&self, index: usize) -> ResourceId {
        self.temps[index]
    }
}

/// 生命周期分析结果
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedGraph {
    passes: Vec<ResolvedPass>,
    /// 每个 ID 最后一次被访问的 Pass 序号（不含 swapchain）
    last_access: BTreeMap<ResourceId, usize>,
}

// getters
impl ResolvedGraph {
    #[inline]
    pub fn passes(&self) -> &[ResolvedPass] {
        &self.passes
    }

    #[inline]
    pub fn pass(&self, pass_no: usize) -> Option<&ResolvedPass> {
        self.passes.get(pass_no)
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn last_access(&self, id: ResourceId) -> Option<usize> {
        self.last_access.get(&id).copied()
    }

    /// 为首次读取的历史资源找到当前帧写入它的 Pass 所用的描述
    pub fn find_desc_for_history_buffer(&self, id: ResourceId) -> Option<RenderResourceDesc> {
        let current = ResourceRef::Managed(id.current());
        self.passes.iter().find_map(|pass| {
            pass.outputs.iter().position(|output| *output == current).map(|index| pass.output_descs[index])
        })
    }
}

/// 解析 Pass 列表
///
/// - `OutputTarget::NextPass` 解析为 `PrevOutput(pass_no, output_index)`
/// - `InputSource::PrevOutput(n)` 解析为上一个 Pass 第 n 个输出的 ID
/// - 临时资源分配 `Temporal(pass_no, index)`
///
/// 相同的声明总是解析出相同的结果。
pub fn resolve_producers(producers: &[ResourceProducer]) -> GraphResult<ResolvedGraph> {
    let mut passes: Vec<ResolvedPass> = Vec::with_capacity(producers.len());
    let mut last_access = BTreeMap::new();

    for (pass_no, producer) in producers.iter().enumerate() {
        // 先处理输出：同一 Pass 内的输入可以看到本 Pass 的输出 ID
        let outputs = producer
            .outputs()
            .iter()
            .enumerate()
            .map(|(index, output)| {
                Ok(match output.target {
                    OutputTarget::Id(id) => ResourceRef::Managed(id),
                    OutputTarget::NextPass => ResourceRef::Managed(ResourceId::prev_output(
                        id_index(pass_no, pass_no, index)?,
                        id_index(index, pass_no, index)?,
                    )),
                    OutputTarget::Swapchain => ResourceRef::Swapchain,
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        for id in outputs.iter().filter_map(ResourceRef::managed) {
            last_access.insert(id, pass_no);
        }

        let inputs = producer
            .inputs()
            .iter()
            .map(|source| match *source {
                InputSource::Id(id) => Ok(id),
                InputSource::PrevOutput(index) => pass_no
                    .checked_sub(1)
                    .and_then(|prev_no| passes.get(prev_no))
                    .and_then(|prev| prev.outputs.get(index))
                    .and_then(ResourceRef::managed)
                    .ok_or(GraphError::DanglingPreviousOutputReference { pass_no, index }),
            })
            .collect::<GraphResult<Vec<_>>>()?;
        for id in &inputs {
            last_access.insert(*id, pass_no);
        }

        let temps = (0..producer.temps().len())
            .map(|index| {
                Ok(ResourceId::temporal(
                    id_index(pass_no, pass_no, index)?,
                    id_index(index, pass_no, index)?,
                ))
            })
            .collect::<GraphResult<Vec<_>>>()?;
        for id in &temps {
            last_access.insert(*id, pass_no);
        }

        passes.push(ResolvedPass {
            name: producer.name().to_string(),
            inputs,
            outputs,
            output_descs: producer.outputs().iter().map(|output| output.desc).collect_vec(),
            temps,
            temp_descs: producer.temps().to_vec(),
        });
    }

    Ok(ResolvedGraph { passes, last_access })
}

/// PrevOutput 与 Temporal ID 中的 Pass 序号和槽位序号都要放进 u8
fn id_index(value: usize, pass_no: usize, slot: usize) -> GraphResult<u8> {
    u8::try_from(value).map_err(|_| GraphError::PassIndexOverflow { pass_no, slot })
}
