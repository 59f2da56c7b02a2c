//! Whole-model generation entry point.

use tidl_abi::AnalysisManager;
use tidl_ir::Model;
use tracing::debug;

use crate::{AbiGenerator, CodegenError, CppImplGenerator, OutputManager};

/// Which backends run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodegenConfig {
    /// C ABI headers and sources.
    pub emit_abi: bool,
    /// Export macros and interface templates (`*.impl.hpp`).
    pub emit_cpp_impl: bool,
    /// `author/{pkg}.impl.cpp` stubs.
    pub emit_stubs: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            emit_abi: true,
            emit_cpp_impl: true,
            emit_stubs: true,
        }
    }
}

/// Generate every enabled file for `model`.
///
/// # Errors
///
/// Fails on the first analysis error or registration conflict.
pub fn generate(model: &Model, config: &CodegenConfig) -> Result<OutputManager, CodegenError> {
    let am = AnalysisManager::new(model);
    generate_with(&am, config)
}

/// Like [`generate`], sharing a caller-owned analysis cache.
pub fn generate_with(
    am: &AnalysisManager<'_>,
    config: &CodegenConfig,
) -> Result<OutputManager, CodegenError> {
    let mut om = OutputManager::new();
    for pkg in am.model().package_ids() {
        if config.emit_abi {
            AbiGenerator::new(am, &mut om).generate_package(pkg)?;
        }
        let mut cpp = CppImplGenerator::new(am, &mut om);
        if config.emit_cpp_impl {
            cpp.generate_impl_header(pkg)?;
        }
        if config.emit_stubs {
            cpp.generate_stubs(pkg)?;
        }
    }
    let stats = am.stats();
    debug!(
        files = om.len(),
        computed = stats.computed,
        hits = stats.hits,
        "generation finished"
    );
    Ok(om)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
