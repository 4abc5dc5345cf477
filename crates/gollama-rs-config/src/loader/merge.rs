//! Merge helpers for layered configuration.

use crate::GollamaConfig;

/// Fill every zero-valued field of `base` from `fallback`.
///
/// `setup_completed` is not touched; the caller decides which layer owns it.
pub(super) fn fill_unset_fields(base: &mut GollamaConfig, fallback: &GollamaConfig) {
    fill_string(&mut base.project_name, &fallback.project_name);
    fill_string(&mut base.ollama_url, &fallback.ollama_url);
    fill_string(&mut base.primary_model, &fallback.primary_model);
    fill_string(&mut base.secondary_model, &fallback.secondary_model);
    fill_string(&mut base.tertiary_model, &fallback.tertiary_model);
    if base.temperature == 0.0 {
        base.temperature = fallback.temperature;
    }
}

fn fill_string(slot: &mut String, fallback: &str) {
    if slot.is_empty() {
        *slot = fallback.to_string();
    }
}
