use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::rendering::{RenderError, RenderResult};

/// Location of a bundled WGSL file.
pub fn shader_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("shaders")
        .join(file_name)
}

pub struct ShaderManager {
    device: Arc<wgpu::Device>,
    shader_modules: HashMap<String, wgpu::ShaderModule>,
}

impl ShaderManager {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            shader_modules: HashMap::new(),
        }
    }

    pub fn load_wgsl_str(&mut self, name: &str, source: &str) {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        self.shader_modules.insert(name.to_string(), module);
    }

    pub fn load_wgsl_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader '{}' from {}", name, path.display()))?;
        self.load_wgsl_str(name, &src);
        log::debug!("Loaded shader '{}' ({} bytes)", name, src.len());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&wgpu::ShaderModule> {
        self.shader_modules.get(name)
    }

    pub fn require(&self, name: &str) -> RenderResult<&wgpu::ShaderModule> {
        self.get(name)
            .ok_or_else(|| RenderError::Shader(format!("shader '{}' not loaded", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_shader_is_bundled() {
        let src = std::fs::read_to_string(shader_path("present.wgsl")).unwrap();
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
        assert!(src.contains("@group(0) @binding(0)"));
        assert!(src.contains("@group(0) @binding(1)"));
    }
}
