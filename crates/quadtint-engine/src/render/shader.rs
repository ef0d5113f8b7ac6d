//! The sprite GPU program and its interface checks.
//!
//! A malformed program or binding layout is a setup-time failure: it is
//! reported once, before any pipeline is built, and never per draw.

use anyhow::{bail, Context, Result};

/// WGSL source of the stage pair.
pub const SPRITE_WGSL: &str = include_str!("shaders/sprite.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group holding the draw uniforms (`matrix` + `colors`).
pub const UNIFORM_GROUP: u32 = 0;
/// Bind group holding the texture and its sampler.
pub const TEXTURE_GROUP: u32 = 1;

/// Resource slots the host must provide, as `(group, binding, name)`.
pub const EXPECTED_BINDINGS: [(u32, u32, &str); 3] = [
    (UNIFORM_GROUP, 0, "u"),
    (TEXTURE_GROUP, 0, "tex"),
    (TEXTURE_GROUP, 1, "tex_sampler"),
];

/// Parses and validates `SPRITE_WGSL` and checks its host interface.
pub fn validate_sprite_shader() -> Result<naga::Module> {
    validate_shader(SPRITE_WGSL)
}

/// Parses and validates a WGSL program against the sprite interface.
///
/// Checks, in order: WGSL syntax, naga module validation, presence of the
/// vertex and fragment entry points, and every slot in [`EXPECTED_BINDINGS`].
pub fn validate_shader(source: &str) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow::anyhow!(e.emit_to_string(source)))
        .context("sprite shader failed to parse")?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("sprite shader failed validation")?;

    let has_entry = |name: &str, stage: naga::ShaderStage| {
        module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
    };
    if !has_entry(VERTEX_ENTRY, naga::ShaderStage::Vertex) {
        bail!("sprite shader has no vertex entry point `{VERTEX_ENTRY}`");
    }
    if !has_entry(FRAGMENT_ENTRY, naga::ShaderStage::Fragment) {
        bail!("sprite shader has no fragment entry point `{FRAGMENT_ENTRY}`");
    }

    for (group, binding, name) in EXPECTED_BINDINGS {
        let found = module.global_variables.iter().any(|(_, var)| {
            var.name.as_deref() == Some(name)
                && var
                    .binding
                    .as_ref()
                    .is_some_and(|b| b.group == group && b.binding == binding)
        });
        if !found {
            bail!("sprite shader is missing `{name}` at @group({group}) @binding({binding})");
        }
    }

    log::debug!("sprite shader validated ({} entry points)", module.entry_points.len());
    Ok(module)
}
