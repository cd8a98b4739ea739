use derive_builder::Builder;
use smol_str::SmolStr;

use crate::{
    ArgumentDef, Error, IndexMap, Result, TypeFull, assert_valid_name,
    types::{check_unique_names, field_map},
};

#[derive(Builder, Debug)]
#[builder(
    pattern = "owned",
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct DirectiveDef {
    #[builder(setter(into))]
    pub name: SmolStr,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<SmolStr>,
    #[builder(
        setter(custom),
        field(
            ty = "Vec<ArgumentDef>",
            build = "field_map(self.args.clone(), |arg| &arg.name)"
        )
    )]
    pub args: IndexMap<SmolStr, ArgumentDef>,
    #[builder(default)]
    pub on_operation: bool,
    #[builder(default)]
    pub on_fragment: bool,
    #[builder(default)]
    pub on_field: bool,
}

impl DirectiveDefBuilder {
    pub fn args(self, args: impl IntoIterator<Item = ArgumentDef>) -> Self {
        let mut new = self;
        new.args = args.into_iter().collect();
        new
    }

    fn validate(&self) -> Result<()> {
        let Some(name) = self.name.as_ref() else {
            return Ok(());
        };
        assert_valid_name(name)?;
        check_unique_names(
            &format!("@{name}").into(),
            self.args.iter().map(|arg| &arg.name),
        )
    }
}

impl DirectiveDef {
    pub fn maybe_arg(&self, name: &str) -> Option<&ArgumentDef> {
        self.args.get(name)
    }
}

fn condition_directive(name: &str, description: &str, condition_description: &str) -> DirectiveDef {
    let mut condition = ArgumentDef::new("if", TypeFull::NonNull(Box::new("Boolean".into())));
    condition.description = Some(condition_description.into());
    DirectiveDef {
        name: name.into(),
        description: Some(description.into()),
        args: [(condition.name.clone(), condition)].into_iter().collect(),
        on_operation: false,
        on_fragment: true,
        on_field: true,
    }
}

pub fn include_directive() -> DirectiveDef {
    condition_directive(
        "include",
        "Directs the executor to include this field or fragment only when the `if` argument is true.",
        "Included when true.",
    )
}

pub fn skip_directive() -> DirectiveDef {
    condition_directive(
        "skip",
        "Directs the executor to skip this field or fragment when the `if` argument is true.",
        "Skipped when true.",
    )
}

pub fn builtin_directives() -> Vec<DirectiveDef> {
    vec![include_directive(), skip_directive()]
}
