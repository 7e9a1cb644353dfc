//! JSON model snapshots (DTO layer).
//!
//! A parser collaborator hands its forest over as one JSON document per
//! compilation unit. These types exist solely for serde deserialization and
//! are converted into the [`Program`] arena by [`assemble`].
//!
//! ```json
//! {
//!   "file": "src/main/java/com/acme/service/UserServiceImpl.java",
//!   "namespace": "com.acme.service",
//!   "imports": ["org.springframework.stereotype.Service"],
//!   "types": [{
//!     "name": "UserServiceImpl",
//!     "line": 7,
//!     "annotations": [{ "type": "org.springframework.stereotype.Service" }],
//!     "interfaces": ["com.acme.service.UserService"]
//!   }]
//! }
//! ```

use crate::model::{
    Annotation, AnnotationValue, Expression, ExpressionKind, Field, FieldRef, Method, ModelError,
    Modifiers, Program, ProgramBuilder, SourcePosition, TypeId, TypeKind, TypeSpec,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One compilation unit.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilationUnitDto {
    /// Source file path.
    pub file: PathBuf,
    /// Qualified namespace; empty for the root.
    #[serde(default)]
    pub namespace: String,
    /// Qualified imported types.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Top-level types of the unit.
    #[serde(default)]
    pub types: Vec<TypeDto>,
}

/// Structural kind as written in a snapshot.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDto {
    /// `class`.
    #[default]
    Class,
    /// `interface`.
    Interface,
    /// `enum`.
    Enum,
    /// `annotation`.
    Annotation,
    /// `other`.
    Other,
}

/// A declaration modifier.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierDto {
    /// `abstract`.
    Abstract,
    /// `static`.
    Static,
    /// `private`.
    Private,
    /// `anonymous`.
    Anonymous,
    /// `local`.
    Local,
    /// `implicit`.
    Implicit,
    /// `public` (no structural meaning).
    Public,
    /// `protected` (no structural meaning).
    Protected,
    /// `final` (no structural meaning).
    Final,
}

/// A type declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDto {
    /// Simple name.
    pub name: String,
    /// Structural kind (default: class).
    #[serde(default)]
    pub kind: KindDto,
    /// Modifiers.
    #[serde(default)]
    pub modifiers: Vec<ModifierDto>,
    /// Declaration line.
    #[serde(default)]
    pub line: usize,
    /// Annotations.
    #[serde(default)]
    pub annotations: Vec<AnnotationDto>,
    /// Superclass.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Fields.
    #[serde(default)]
    pub fields: Vec<FieldDto>,
    /// Methods and constructors.
    #[serde(default)]
    pub methods: Vec<MethodDto>,
    /// Expressions of initializer blocks.
    #[serde(default)]
    pub initializers: Vec<ExprDto>,
    /// Nested types.
    #[serde(default)]
    pub nested: Vec<TypeDto>,
}

/// A field declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDto {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declaration line.
    #[serde(default)]
    pub line: usize,
    /// Annotations.
    #[serde(default)]
    pub annotations: Vec<AnnotationDto>,
    /// Initializer expressions.
    #[serde(default)]
    pub initializer: Vec<ExprDto>,
}

/// A method declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodDto {
    /// Method name.
    pub name: String,
    /// Parameter types.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Return type; absent for constructors.
    #[serde(default)]
    pub returns: Option<String>,
    /// Declared thrown types.
    #[serde(default)]
    pub throws: Vec<String>,
    /// Declaration line.
    #[serde(default)]
    pub line: usize,
    /// Annotations.
    #[serde(default)]
    pub annotations: Vec<AnnotationDto>,
    /// Body expressions.
    #[serde(default)]
    pub body: Vec<ExprDto>,
}

/// An annotation usage.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationDto {
    /// Qualified annotation type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Named arguments.
    #[serde(default)]
    pub arguments: BTreeMap<String, ValueDto>,
    /// Line; defaults to the annotated declaration's line.
    #[serde(default)]
    pub line: Option<usize>,
}

/// An annotation argument value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValueDto {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Array of values.
    Array(Vec<ValueDto>),
    /// `{ "enum": "pkg.Type", "constant": "NAME" }`.
    EnumConstant {
        /// Qualified enum type.
        #[serde(rename = "enum")]
        ty: String,
        /// Constant name.
        constant: String,
    },
    /// `{ "class": "pkg.Type" }`.
    ClassLiteral {
        /// Qualified type.
        class: String,
    },
}

/// A static field read.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRefDto {
    /// Qualified declaring type.
    pub owner: String,
    /// Field name.
    pub field: String,
}

/// An expression, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExprDto {
    /// Constructor call.
    New {
        /// Instantiated type.
        #[serde(rename = "type")]
        ty: String,
        /// Argument types.
        #[serde(default)]
        arguments: Vec<String>,
        /// Line.
        #[serde(default)]
        line: usize,
    },
    /// Member invocation.
    Call {
        /// Type declaring the method, not the receiver's static type.
        declaring: String,
        /// Method name.
        method: String,
        /// Argument types.
        #[serde(default)]
        arguments: Vec<String>,
        /// Receiver field read.
        #[serde(default)]
        receiver: Option<FieldRefDto>,
        /// Line.
        #[serde(default)]
        line: usize,
    },
    /// `throw`.
    Throw {
        /// Thrown type.
        #[serde(rename = "type")]
        ty: String,
        /// Line.
        #[serde(default)]
        line: usize,
    },
    /// Field read.
    FieldRead {
        /// Qualified declaring type.
        owner: String,
        /// Field name.
        field: String,
        /// Line.
        #[serde(default)]
        line: usize,
    },
    /// Bare type reference.
    TypeRef {
        /// Referenced type.
        #[serde(rename = "type")]
        ty: String,
        /// Line.
        #[serde(default)]
        line: usize,
    },
}

// ────────────────────────────────────────────
// DTO → Program
// ────────────────────────────────────────────

/// Parses one compilation unit.
///
/// # Errors
///
/// Returns an error if the JSON does not match the snapshot schema.
pub fn parse_unit(json: &str) -> Result<CompilationUnitDto, serde_json::Error> {
    serde_json::from_str(json)
}

/// Assembles compilation units into a [`Program`].
///
/// # Errors
///
/// Returns an error if a namespace is malformed or a declaration is
/// declared twice.
pub fn assemble<I>(units: I) -> Result<Program, ModelError>
where
    I: IntoIterator<Item = CompilationUnitDto>,
{
    let mut builder = ProgramBuilder::new();
    for unit in units {
        add_unit(&mut builder, unit)?;
    }
    Ok(builder.build())
}

/// Adds one compilation unit to a builder.
///
/// # Errors
///
/// Returns an error if a namespace is malformed or a declaration is
/// declared twice.
pub fn add_unit(builder: &mut ProgramBuilder, unit: CompilationUnitDto) -> Result<(), ModelError> {
    let namespace = builder.namespace(&unit.namespace)?;
    for mut dto in unit.types {
        let nested = std::mem::take(&mut dto.nested);
        let mut spec = convert_type(&unit.file, dto);
        spec.imports.clone_from(&unit.imports);
        let id = builder.add_type(namespace, spec)?;
        add_nested(builder, &unit.file, id, nested)?;
    }
    Ok(())
}

fn add_nested(
    builder: &mut ProgramBuilder,
    file: &Path,
    outer: TypeId,
    nested: Vec<TypeDto>,
) -> Result<(), ModelError> {
    for mut dto in nested {
        let inner = std::mem::take(&mut dto.nested);
        let id = builder.add_nested(outer, convert_type(file, dto))?;
        add_nested(builder, file, id, inner)?;
    }
    Ok(())
}

fn convert_type(file: &Path, dto: TypeDto) -> TypeSpec {
    let position = SourcePosition::new(file, dto.line);
    let kind = match dto.kind {
        KindDto::Class => TypeKind::Class,
        KindDto::Interface => TypeKind::Interface,
        KindDto::Enum => TypeKind::Enum,
        KindDto::Annotation => TypeKind::Annotation,
        KindDto::Other => TypeKind::Other,
    };
    TypeSpec {
        name: dto.name,
        kind,
        modifiers: convert_modifiers(&dto.modifiers),
        annotations: convert_annotations(file, dto.line, dto.annotations),
        superclass: dto.superclass,
        interfaces: dto.interfaces,
        fields: dto.fields.into_iter().map(|f| convert_field(file, f)).collect(),
        methods: dto
            .methods
            .into_iter()
            .map(|m| convert_method(file, m))
            .collect(),
        initializers: convert_exprs(file, dto.initializers),
        imports: Vec::new(),
        position,
    }
}

fn convert_modifiers(dtos: &[ModifierDto]) -> Modifiers {
    let mut modifiers = Modifiers::default();
    for modifier in dtos {
        match modifier {
            ModifierDto::Abstract => modifiers.is_abstract = true,
            ModifierDto::Static => modifiers.is_static = true,
            ModifierDto::Private => modifiers.is_private = true,
            ModifierDto::Anonymous => modifiers.is_anonymous = true,
            ModifierDto::Local => modifiers.is_local = true,
            ModifierDto::Implicit => modifiers.is_implicit = true,
            ModifierDto::Public | ModifierDto::Protected | ModifierDto::Final => {}
        }
    }
    modifiers
}

fn convert_field(file: &Path, dto: FieldDto) -> Field {
    Field {
        annotations: convert_annotations(file, dto.line, dto.annotations),
        initializer: convert_exprs(file, dto.initializer),
        position: SourcePosition::new(file, dto.line),
        name: dto.name,
        ty: dto.ty,
    }
}

fn convert_method(file: &Path, dto: MethodDto) -> Method {
    Method {
        annotations: convert_annotations(file, dto.line, dto.annotations),
        body: convert_exprs(file, dto.body),
        position: SourcePosition::new(file, dto.line),
        name: dto.name,
        parameters: dto.parameters,
        return_type: dto.returns,
        throws: dto.throws,
    }
}

fn convert_annotations(file: &Path, owner_line: usize, dtos: Vec<AnnotationDto>) -> Vec<Annotation> {
    dtos.into_iter()
        .map(|dto| Annotation {
            position: SourcePosition::new(file, dto.line.unwrap_or(owner_line)),
            ty: dto.ty,
            arguments: dto
                .arguments
                .into_iter()
                .map(|(name, value)| (name, convert_value(value)))
                .collect(),
        })
        .collect()
}

fn convert_value(dto: ValueDto) -> AnnotationValue {
    match dto {
        ValueDto::Bool(b) => AnnotationValue::Bool(b),
        ValueDto::Int(i) => AnnotationValue::Int(i),
        ValueDto::Str(s) => AnnotationValue::Str(s),
        ValueDto::Array(items) => AnnotationValue::Array(items.into_iter().map(convert_value).collect()),
        ValueDto::EnumConstant { ty, constant } => AnnotationValue::Enum { ty, constant },
        ValueDto::ClassLiteral { class } => AnnotationValue::Class(class),
    }
}

fn convert_exprs(file: &Path, dtos: Vec<ExprDto>) -> Vec<Expression> {
    dtos.into_iter().map(|dto| convert_expr(file, dto)).collect()
}

fn convert_expr(file: &Path, dto: ExprDto) -> Expression {
    let (kind, line) = match dto {
        ExprDto::New {
            ty,
            arguments,
            line,
        } => (ExpressionKind::Instantiation { ty, arguments }, line),
        ExprDto::Call {
            declaring,
            method,
            arguments,
            receiver,
            line,
        } => (
            ExpressionKind::Invocation {
                declaring_type: declaring,
                method,
                arguments,
                receiver: receiver.map(|r| FieldRef {
                    owner: r.owner,
                    field: r.field,
                }),
            },
            line,
        ),
        ExprDto::Throw { ty, line } => (ExpressionKind::Throw { ty }, line),
        ExprDto::FieldRead { owner, field, line } => {
            (ExpressionKind::FieldAccess(FieldRef { owner, field }), line)
        }
        ExprDto::TypeRef { ty, line } => (ExpressionKind::TypeReference { ty }, line),
    };
    Expression::new(kind, SourcePosition::new(file, line))
}
