use std::{collections::HashSet, ptr};

use itertools::Itertools;
use squalid::_d;
use tracing::{instrument, trace};

use super::pair_set::PairSet;
use crate::{
    Argument, Conflict, ConflictReason, ConflictReasonMessage, Directive, Document,
    ExecutableDefinition, FieldDef, FragmentLookup, IndexMap, Schema, Selection, SelectionField,
    Type, ValidationError,
};

type FieldAndDef<'a, 's> = (&'a SelectionField, Option<&'s FieldDef>);
type FieldMap<'a, 's> = IndexMap<&'a str, Vec<FieldAndDef<'a, 's>>>;

/// Finds pairs of fields that share a response name but could not be
/// merged into a single response entry.
///
/// Every pair of field nodes is compared at most once over the lifetime of
/// the validator, so a conflict reachable through several fragments is
/// reported once.
pub struct OverlappingFieldsValidator<'a, 's> {
    schema: &'s Schema,
    fragments: &'a dyn FragmentLookup,
    compared: PairSet<'a, SelectionField>,
}

impl<'a, 's> OverlappingFieldsValidator<'a, 's> {
    pub fn new(schema: &'s Schema, fragments: &'a dyn FragmentLookup) -> Self {
        Self {
            schema,
            fragments,
            compared: _d(),
        }
    }

    #[instrument(level = "trace", skip_all)]
    pub fn find_conflicts_within_selection_set(
        &mut self,
        parent_type: Option<&'s Type>,
        selection_set: &'a [Selection],
    ) -> Vec<Conflict<'a>> {
        let mut field_map: FieldMap<'a, 's> = _d();
        self.collect_fields(parent_type, selection_set, &mut _d(), &mut field_map);
        self.find_conflicts(&field_map)
    }

    /// Validates `selection_set` after every selection set nested inside
    /// it, so that conflicts get attributed to the deepest selection set
    /// containing both fields.
    fn visit_selection_set(
        &mut self,
        parent_type: Option<&'s Type>,
        selection_set: &'a [Selection],
        errors: &mut Vec<ValidationError<'a>>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    if let Some(field_selection_set) = field.selection_set.as_ref() {
                        let field_type = parent_type
                            .and_then(|parent_type| parent_type.maybe_field(&field.name))
                            .and_then(|field_def| self.schema.named_type(&field_def.type_));
                        self.visit_selection_set(field_type, field_selection_set, errors);
                    }
                }
                Selection::InlineFragment(inline_fragment) => {
                    let fragment_type = match inline_fragment.on.as_ref() {
                        Some(on) => self.schema.maybe_type(on),
                        None => parent_type,
                    };
                    self.visit_selection_set(fragment_type, &inline_fragment.selection_set, errors);
                }
                // fragment definitions get visited on their own
                Selection::FragmentSpread(_) => {}
            }
        }
        errors.extend(
            self.find_conflicts_within_selection_set(parent_type, selection_set)
                .into_iter()
                .map(ValidationError::from),
        );
    }

    fn collect_fields(
        &self,
        parent_type: Option<&'s Type>,
        selection_set: &'a [Selection],
        visited_fragment_names: &mut HashSet<&'a str>,
        field_map: &mut FieldMap<'a, 's>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    let field_def =
                        parent_type.and_then(|parent_type| parent_type.maybe_field(&field.name));
                    field_map
                        .entry(field.response_name())
                        .or_default()
                        .push((field, field_def));
                }
                Selection::InlineFragment(inline_fragment) => {
                    let fragment_type = match inline_fragment.on.as_ref() {
                        Some(on) => self.schema.maybe_type(on),
                        None => parent_type,
                    };
                    self.collect_fields(
                        fragment_type,
                        &inline_fragment.selection_set,
                        visited_fragment_names,
                        field_map,
                    );
                }
                Selection::FragmentSpread(fragment_spread) => {
                    if !visited_fragment_names.insert(&fragment_spread.name) {
                        trace!(fragment = %fragment_spread.name, "fragment already collected");
                        continue;
                    }
                    let Some(fragment) = self.fragments.maybe_fragment(&fragment_spread.name)
                    else {
                        continue;
                    };
                    self.collect_fields(
                        self.schema.maybe_type(&fragment.on),
                        &fragment.selection_set,
                        visited_fragment_names,
                        field_map,
                    );
                }
            }
        }
    }

    fn find_conflicts(&mut self, field_map: &FieldMap<'a, 's>) -> Vec<Conflict<'a>> {
        let mut conflicts = vec![];
        for (response_name, fields) in field_map {
            for (index_1, index_2) in (0..fields.len()).tuple_combinations() {
                if let Some(conflict) = self.find_conflict(response_name, fields[index_1], fields[index_2]) {
                    conflicts.push(conflict);
                }
            }
        }
        conflicts
    }

    fn find_conflict(
        &mut self,
        response_name: &str,
        (field_1, field_def_1): FieldAndDef<'a, 's>,
        (field_2, field_def_2): FieldAndDef<'a, 's>,
    ) -> Option<Conflict<'a>> {
        if ptr::eq(field_1, field_2) || self.compared.has(field_1, field_2) {
            return None;
        }
        self.compared.add(field_1, field_2);

        let conflict = |message: String| {
            Some(Conflict::new(
                ConflictReason::new(response_name, message.into()),
                vec![field_1, field_2],
            ))
        };

        if field_1.name != field_2.name {
            return conflict(format!(
                "{} and {} are different fields",
                field_1.name, field_2.name
            ));
        }

        let type_1 = field_def_1.map(|field_def| &field_def.type_);
        let type_2 = field_def_2.map(|field_def| &field_def.type_);
        if let (Some(type_1), Some(type_2)) = (type_1, type_2) {
            if !type_1.is_same_type(type_2) {
                return conflict(format!(
                    "they return differing types {type_1} and {type_2}"
                ));
            }
        }

        if !same_arguments(field_1.arguments(), field_2.arguments()) {
            return conflict("they have differing arguments".to_owned());
        }

        if !same_directives(&field_1.directives, &field_2.directives) {
            return conflict("they have differing directives".to_owned());
        }

        let (Some(selection_set_1), Some(selection_set_2)) =
            (field_1.selection_set.as_ref(), field_2.selection_set.as_ref())
        else {
            return None;
        };
        let mut visited_fragment_names = _d();
        let mut subfield_map: FieldMap<'a, 's> = _d();
        self.collect_fields(
            type_1.and_then(|type_| self.schema.named_type(type_)),
            selection_set_1,
            &mut visited_fragment_names,
            &mut subfield_map,
        );
        self.collect_fields(
            type_2.and_then(|type_| self.schema.named_type(type_)),
            selection_set_2,
            &mut visited_fragment_names,
            &mut subfield_map,
        );
        let subfield_conflicts = self.find_conflicts(&subfield_map);
        if subfield_conflicts.is_empty() {
            return None;
        }
        let reasons = subfield_conflicts
            .iter()
            .map(|subfield_conflict| subfield_conflict.reason.clone())
            .collect();
        Some(Conflict::new(
            ConflictReason::new(response_name, ConflictReasonMessage::Nested(reasons)),
            [field_1, field_2]
                .into_iter()
                .chain(
                    subfield_conflicts
                        .into_iter()
                        .flat_map(|subfield_conflict| subfield_conflict.fields),
                )
                .collect(),
        ))
    }
}

fn same_value(argument_1: &Argument, argument_2: &Argument) -> bool {
    argument_1.value.to_string() == argument_2.value.to_string()
}

fn same_arguments(arguments_1: &[Argument], arguments_2: &[Argument]) -> bool {
    arguments_1.len() == arguments_2.len()
        && arguments_1.iter().all(|argument_1| {
            arguments_2
                .iter()
                .find(|argument_2| argument_2.name == argument_1.name)
                .is_some_and(|argument_2| same_value(argument_1, argument_2))
        })
}

fn same_directives(directives_1: &[Directive], directives_2: &[Directive]) -> bool {
    directives_1.len() == directives_2.len()
        && directives_1.iter().all(|directive_1| {
            directives_2
                .iter()
                .find(|directive_2| directive_2.name == directive_1.name)
                .is_some_and(|directive_2| {
                    same_arguments(directive_1.arguments(), directive_2.arguments())
                })
        })
}

/// Checks every selection set of every operation and fragment definition in
/// the document, innermost selection sets first.
#[instrument(level = "trace", skip_all)]
pub fn validate_overlapping_fields<'a>(
    schema: &Schema,
    document: &'a Document,
) -> Vec<ValidationError<'a>> {
    let mut validator = OverlappingFieldsValidator::new(schema, document);
    let mut errors = vec![];
    for definition in &document.definitions {
        match definition {
            ExecutableDefinition::Operation(operation) => validator.visit_selection_set(
                schema.root_type(operation.operation_type),
                &operation.selection_set,
                &mut errors,
            ),
            ExecutableDefinition::Fragment(fragment) => validator.visit_selection_set(
                schema.maybe_type(&fragment.on),
                &fragment.selection_set,
                &mut errors,
            ),
        }
    }
    errors
}
