use std::collections::BTreeSet;

use crate::graph::{RelationKind, Relationship};
use crate::model::{MemberField, MemberMethod, SourceUnit, TypeEntity, Visibility};
use crate::syntax::TypeKind;

pub const DEFAULT_TITLE: &str = "Comprehender Architecture Diagram";

/// Class diagram builder.
///
/// Packages are emitted in the order they were first added, types within a
/// package likewise. Relationship lines are sorted.
#[derive(Debug, Clone)]
pub struct PlantUml<'a> {
    title: String,
    packages: Vec<(&'a str, Vec<&'a TypeEntity>)>,
    relations: BTreeSet<String>,
}

impl<'a> PlantUml<'a> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            packages: Vec::new(),
            relations: BTreeSet::new(),
        }
    }

    pub fn add_unit(&mut self, unit: &'a SourceUnit) {
        for entity in &unit.types {
            self.add_type(&unit.package, entity);
        }
    }

    pub fn add_type(&mut self, package: &'a str, entity: &'a TypeEntity) {
        match self.packages.iter_mut().find(|(name, _)| *name == package) {
            Some((_, types)) => types.push(entity),
            None => self.packages.push((package, vec![entity])),
        }
    }

    pub fn add_relationship(&mut self, relationship: &Relationship) {
        self.relations.insert(relationship_line(relationship));
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("@startuml\n");
        output.push_str("skinparam packageStyle rect\n");
        output.push_str(&format!("title {}\n", self.title));

        for (package, types) in &self.packages {
            output.push('\n');
            output.push_str(&format!(
                "package \"{}\" as {} {{\n",
                package,
                package_alias(package)
            ));
            for entity in types {
                write_type_block(&mut output, entity);
            }
            output.push_str("}\n");
        }

        output.push_str("\n' Relationships\n");
        for line in &self.relations {
            output.push_str(line);
            output.push('\n');
        }

        output.push_str("\n@enduml\n");
        output
    }
}

/// Render a whole project in one call.
pub fn render_diagram<'a, I>(
    units: I,
    relationships: &BTreeSet<Relationship>,
    title: &str,
) -> String
where
    I: IntoIterator<Item = &'a SourceUnit>,
{
    let mut diagram = PlantUml::new(title);
    for unit in units {
        diagram.add_unit(unit);
    }
    for relationship in relationships {
        diagram.add_relationship(relationship);
    }
    diagram.render()
}

pub fn package_alias(package: &str) -> String {
    package.replace('.', "_")
}

pub fn format_field(field: &MemberField) -> String {
    let mut stereotypes = Vec::new();
    if field.modifiers.contains("static") {
        stereotypes.push("static");
    }
    if field.modifiers.contains("final") {
        stereotypes.push("final");
    }
    format!(
        "{} {} : {}{}",
        Visibility::of(&field.modifiers).symbol(),
        field.name,
        field.type_name,
        stereotype_suffix(&stereotypes)
    )
}

pub fn format_method(method: &MemberMethod) -> String {
    let mut stereotypes = Vec::new();
    if method.modifiers.contains("abstract") {
        stereotypes.push("abstract");
    }
    if method.modifiers.contains("static") {
        stereotypes.push("static");
    }
    format!(
        "{} {}(){}",
        Visibility::of(&method.modifiers).symbol(),
        method.name,
        stereotype_suffix(&stereotypes)
    )
}

pub fn relationship_line(relationship: &Relationship) -> String {
    let Relationship {
        kind,
        source,
        target,
    } = relationship;
    match kind {
        RelationKind::Extends => format!("{target} <|-- {source} : extends"),
        RelationKind::Implements => format!("{target} <|.. {source} : implements"),
        RelationKind::Uses => format!("{source} ..> {target} : uses"),
    }
}

fn stereotype_suffix(stereotypes: &[&str]) -> String {
    if stereotypes.is_empty() {
        String::new()
    } else {
        format!(" {{{{{}}}}}", stereotypes.join(", "))
    }
}

fn block_header(entity: &TypeEntity) -> String {
    let name = &entity.name;
    if entity.is_interface() {
        return format!("interface {name} <<interface>>");
    }
    if entity.is_abstract() {
        return format!("abstract class {name} <<abstract>>");
    }
    match entity.kind {
        TypeKind::Enum => format!("enum {name}"),
        TypeKind::Annotation => format!("annotation {name}"),
        TypeKind::Record => format!("class {name} <<record>>"),
        TypeKind::Class | TypeKind::Interface => format!("class {name}"),
    }
}

fn write_type_block(output: &mut String, entity: &TypeEntity) {
    output.push_str(&format!("  {} {{\n", block_header(entity)));
    for field in &entity.fields {
        output.push_str(&format!("    {}\n", format_field(field)));
    }
    for method in &entity.methods {
        output.push_str(&format!("    {}\n", format_method(method)));
    }
    output.push_str("  }\n");
}
