use slotmap::new_key_type;

// GPU 对象句柄，由 GfxDevice 的实现分配
new_key_type! {
    /// 纹理句柄
    pub struct GfxTextureHandle;
    /// Render Target View 句柄
    pub struct GfxRtvHandle;
    /// Depth Stencil View 句柄
    pub struct GfxDsvHandle;
    /// Shader Resource View 句柄
    pub struct GfxSrvHandle;
    /// Unordered Access View 句柄
    pub struct GfxUavHandle;
}
