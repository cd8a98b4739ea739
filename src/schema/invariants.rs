use std::iter;

use smol_str::SmolStr;
use tracing::trace;

use crate::{
    Error, FieldDef, IndexMap, InputObjectType, ObjectType, Result, Schema, Type, TypeFull,
    TypeInterface, UnionType, types::check_unique_names,
};

impl Schema {
    pub(super) fn check_root_types(&self) -> Result<()> {
        for name in iter::once(&self.query_type_name).chain(self.mutation_type_name.as_ref()) {
            match self.maybe_type(name) {
                Some(Type::Object(_)) => {}
                Some(_) => return Err(Error::RootTypeNotObject(name.clone())),
                None => {
                    return Err(Error::UnknownType {
                        name: name.clone(),
                        referenced_by: "schema".into(),
                    });
                }
            }
        }
        Ok(())
    }

    pub(super) fn check_types(&self) -> Result<()> {
        for type_ in self.types.values() {
            trace!(name = type_.name(), kind = %type_.kind(), "checking type");
            match type_ {
                Type::Object(object_type) => {
                    object_type.check_unique_field_names()?;
                    self.check_fields(&object_type.name, object_type.fields())?;
                    self.check_interfaces(object_type)?;
                }
                Type::Interface(interface) => {
                    interface.check_unique_field_names()?;
                    self.check_fields(&interface.name, interface.fields())?;
                }
                Type::Union(union) => self.check_union(union)?,
                Type::InputObject(input_object) => {
                    input_object.check_unique_field_names()?;
                    self.check_input_fields(input_object)?;
                }
                Type::Scalar(_) | Type::Enum(_) => {}
            }
        }
        Ok(())
    }

    pub(super) fn check_directives(&self) -> Result<()> {
        for directive in self.directives.values() {
            for arg in directive.args.values() {
                let arg_type = self.resolve_reference(&arg.type_, || {
                    format!("@{}({}:)", directive.name, arg.name).into()
                })?;
                if !arg_type.is_input_type() {
                    return Err(Error::DirectiveArgumentNotInputType {
                        directive_name: directive.name.clone(),
                        argument_name: arg.name.clone(),
                        type_: arg.type_.to_string().into(),
                    });
                }
            }
        }
        Ok(())
    }

    fn resolve_reference(
        &self,
        type_: &TypeFull,
        referenced_by: impl FnOnce() -> SmolStr,
    ) -> Result<&Type> {
        type_.check_well_formed()?;
        self.maybe_type(type_.name())
            .ok_or_else(|| Error::UnknownType {
                name: type_.name().into(),
                referenced_by: referenced_by(),
            })
    }

    fn check_fields(&self, type_name: &SmolStr, fields: &IndexMap<SmolStr, FieldDef>) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::EmptyFields(type_name.clone()));
        }
        for field in fields.values() {
            let field_type = self.resolve_reference(&field.type_, || {
                format!("{type_name}.{}", field.name).into()
            })?;
            if !field_type.is_output_type() {
                return Err(Error::FieldNotOutputType {
                    type_name: type_name.clone(),
                    field_name: field.name.clone(),
                    type_: field.type_.to_string().into(),
                });
            }
            for arg in field.args.values() {
                let arg_type = self.resolve_reference(&arg.type_, || {
                    format!("{type_name}.{}({}:)", field.name, arg.name).into()
                })?;
                if !arg_type.is_input_type() {
                    return Err(Error::ArgumentNotInputType {
                        type_name: type_name.clone(),
                        field_name: field.name.clone(),
                        argument_name: arg.name.clone(),
                        type_: arg.type_.to_string().into(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_interfaces(&self, object_type: &ObjectType) -> Result<()> {
        check_unique_names(&object_type.name, object_type.interfaces())?;
        for interface_name in object_type.interfaces() {
            let interface = match self.maybe_type(interface_name) {
                Some(Type::Interface(interface)) => interface,
                Some(_) => {
                    return Err(Error::ImplementsNonInterface {
                        type_name: object_type.name.clone(),
                        interface: interface_name.clone(),
                    });
                }
                None => {
                    return Err(Error::UnknownType {
                        name: interface_name.clone(),
                        referenced_by: object_type.name.clone(),
                    });
                }
            };
            if !interface.has_resolve_type() && !object_type.has_is_type_of() {
                return Err(Error::UnresolvableImplementation {
                    interface: interface.name.clone(),
                    type_name: object_type.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_union(&self, union: &UnionType) -> Result<()> {
        if union.types().is_empty() {
            return Err(Error::EmptyUnion(union.name.clone()));
        }
        check_unique_names(&union.name, union.types())?;
        for member in union.types() {
            match self.maybe_type(member) {
                Some(Type::Object(object_type)) => {
                    if !union.has_resolve_type() && !object_type.has_is_type_of() {
                        return Err(Error::UnresolvablePossibleType {
                            union: union.name.clone(),
                            member: member.clone(),
                        });
                    }
                }
                Some(_) => {
                    return Err(Error::UnionMemberNotObject {
                        union: union.name.clone(),
                        member: member.clone(),
                    });
                }
                None => {
                    return Err(Error::UnknownType {
                        name: member.clone(),
                        referenced_by: union.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_input_fields(&self, input_object: &InputObjectType) -> Result<()> {
        let fields = input_object.fields();
        if fields.is_empty() {
            return Err(Error::EmptyFields(input_object.name.clone()));
        }
        for field in fields.values() {
            let field_type = self.resolve_reference(&field.type_, || {
                format!("{}.{}", input_object.name, field.name).into()
            })?;
            if !field_type.is_input_type() {
                return Err(Error::InputFieldNotInputType {
                    type_name: input_object.name.clone(),
                    field_name: field.name.clone(),
                    type_: field.type_.to_string().into(),
                });
            }
        }
        Ok(())
    }
}
