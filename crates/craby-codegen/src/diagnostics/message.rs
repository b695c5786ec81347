use rowan::TextRange;

/// Diagnostic kinds, ordered so that syntax problems sort before the semantic
/// problems they tend to cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Malformed source
    UnexpectedToken,
    ExpectedName,
    ExpectedType,
    NestingTooDeep,

    // Module handle
    MissingModuleHandle,
    MultipleModuleHandles,
    InvalidModuleHandle,
    MissingSpecInterface,
    DuplicateModule,
    SharedTypeName,

    // Declarations
    DuplicateDeclaration,
    DuplicateMember,
    NameCollision,
    InvalidMember,
    UndefinedType,
    AliasCycle,
    RecordCycle,
    EmptyEnum,
    MixedEnum,
    InvalidEnumValue,

    // Types
    MisplacedType,
    UnsupportedType,
}

impl DiagnosticKind {
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingModuleHandle => {
                Some("add `export default TurboModuleRegistry.getEnforcing<Spec>('ModuleName');`")
            }
            Self::MixedEnum => Some("use only string values or only numeric values"),
            Self::RecordCycle => Some("records are passed by value and cannot contain themselves"),
            Self::NameCollision => Some("rename one of the identifiers"),
            _ => None,
        }
    }

    /// Base message for this kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::ExpectedName => "expected a name",
            Self::ExpectedType => "expected a type",
            Self::NestingTooDeep => "type nesting is too deep",

            Self::MissingModuleHandle => "no module handle found",
            Self::MultipleModuleHandles => "more than one module handle",
            Self::InvalidModuleHandle => "invalid module handle",
            Self::MissingSpecInterface => "spec interface not found",
            Self::DuplicateModule => "duplicate module name",
            Self::SharedTypeName => "type declared by more than one module",

            Self::DuplicateDeclaration => "duplicate declaration",
            Self::DuplicateMember => "duplicate member",
            Self::NameCollision => "names collide after conversion",
            Self::InvalidMember => "invalid member",
            Self::UndefinedType => "undefined type",
            Self::AliasCycle => "type alias refers to itself",
            Self::RecordCycle => "record types form a cycle",
            Self::EmptyEnum => "enum has no members",
            Self::MixedEnum => "enum mixes string and numeric values",
            Self::InvalidEnumValue => "invalid enum value",

            Self::MisplacedType => "type not allowed here",
            Self::UnsupportedType => "unsupported type",
        }
    }

    /// Template for a custom message; `{}` is replaced with the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateDeclaration => "`{}` is already declared".to_string(),
            Self::UndefinedType => "type `{}` is not declared".to_string(),
            Self::AliasCycle => "type alias `{}` refers to itself".to_string(),
            Self::EmptyEnum => "enum `{}` has no members".to_string(),
            Self::MixedEnum => "enum `{}` mixes string and numeric values".to_string(),
            Self::DuplicateModule => "module `{}` is declared by more than one spec".to_string(),
            Self::SharedTypeName => "type `{}` is declared by more than one module".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// `None` gives the fallback message; `Some(detail)` fills the custom template.
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hint: Option<String>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
            hint: kind.default_hint().map(str::to_string),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
