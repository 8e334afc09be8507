use super::ShaderCompileError;

/// Pipeline stage an entry point belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// Scalar kind written to color attachment 0 by a fragment entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ColorOutput {
    Float,
    Sint,
    Uint,
}

/// A named entry point found in a compiled module.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryPoint {
    pub name: String,
    pub stage: ShaderStage,
    /// `@location(0)` output kind; `None` for non-fragment stages.
    pub color_output: Option<ColorOutput>,
}

/// Entry points declared by a module after parsing and validation.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ShaderReflection {
    entry_points: Vec<EntryPoint>,
}

impl ShaderReflection {
    /// Parses and validates WGSL, returning its entry points.
    ///
    /// No GPU objects are created; this is the compiler front half of
    /// [`super::ShaderModule::compile`].
    pub fn from_wgsl(label: &str, source: &str) -> Result<Self, ShaderCompileError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderCompileError {
            label: label.to_string(),
            diagnostics: e.emit_to_string(source),
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        validator.validate(&module).map_err(|e| ShaderCompileError {
            label: label.to_string(),
            diagnostics: e.emit_to_string(source),
        })?;

        let entry_points = module
            .entry_points
            .iter()
            .filter_map(|ep| {
                let stage = match ep.stage {
                    naga::ShaderStage::Vertex => ShaderStage::Vertex,
                    naga::ShaderStage::Fragment => ShaderStage::Fragment,
                    naga::ShaderStage::Compute => ShaderStage::Compute,
                    // Task/mesh stages are not usable by a render pipeline here.
                    #[allow(unreachable_patterns)]
                    _ => return None,
                };
                let color_output = match stage {
                    ShaderStage::Fragment => color_output(&module, &ep.function),
                    _ => None,
                };
                Some(EntryPoint {
                    name: ep.name.clone(),
                    stage,
                    color_output,
                })
            })
            .collect();

        Ok(Self { entry_points })
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    /// Whether an entry point called `name` exists for `stage`.
    pub fn has_entry_point(&self, stage: ShaderStage, name: &str) -> bool {
        self.entry_points
            .iter()
            .any(|ep| ep.stage == stage && ep.name == name)
    }

    /// Looks up an entry point by stage and name.
    pub fn entry_point(&self, stage: ShaderStage, name: &str) -> Option<&EntryPoint> {
        self.entry_points
            .iter()
            .find(|ep| ep.stage == stage && ep.name == name)
    }
}

fn color_output(module: &naga::Module, function: &naga::Function) -> Option<ColorOutput> {
    let result = function.result.as_ref()?;

    let ty = match result.binding {
        Some(naga::Binding::Location { location: 0, .. }) => result.ty,
        Some(_) => return None,
        None => match &module.types[result.ty].inner {
            naga::TypeInner::Struct { members, .. } => members
                .iter()
                .find(|m| matches!(m.binding, Some(naga::Binding::Location { location: 0, .. })))?
                .ty,
            _ => return None,
        },
    };

    let kind = match module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => scalar.kind,
        naga::TypeInner::Vector { scalar, .. } => scalar.kind,
        _ => return None,
    };
    match kind {
        naga::ScalarKind::Float => Some(ColorOutput::Float),
        naga::ScalarKind::Sint => Some(ColorOutput::Sint),
        naga::ScalarKind::Uint => Some(ColorOutput::Uint),
        _ => None,
    }
}
