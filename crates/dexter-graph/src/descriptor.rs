//! JVM field and method descriptor parsing (JVMS §4.3).
//!
//! Parsing is zero-copy: class names borrow from the input. Interning into
//! [`crate::TypeId`]s happens in [`crate::TypeInterner`].

use crate::types::PrimitiveKind;
use smallvec::SmallVec;
use std::fmt;

/// Array types may have at most 255 dimensions (JVMS §4.3.2).
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Element type of a field descriptor once array dimensions are stripped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseType<'a> {
    Primitive(PrimitiveKind),
    /// Internal binary name, e.g. `java/lang/Object`.
    Object(&'a str),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    pub dimensions: u8,
    pub base: BaseType<'a>,
}

impl FieldDescriptor<'_> {
    #[inline]
    pub fn is_void(&self) -> bool {
        self.dimensions == 0 && self.base == BaseType::Primitive(PrimitiveKind::Void)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor<'a> {
    pub params: SmallVec<[FieldDescriptor<'a>; 4]>,
    pub ret: FieldDescriptor<'a>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    Empty,
    UnexpectedChar { descriptor: String, offset: usize },
    UnterminatedClassName { descriptor: String },
    TooManyDimensions { descriptor: String },
    VoidNotAllowed { descriptor: String },
    TrailingInput { descriptor: String, offset: usize },
    MissingParameterList { descriptor: String },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Empty => write!(f, "empty descriptor"),
            DescriptorError::UnexpectedChar { descriptor, offset } => {
                write!(f, "unexpected character at offset {offset} in descriptor `{descriptor}`")
            }
            DescriptorError::UnterminatedClassName { descriptor } => {
                write!(f, "unterminated class name in descriptor `{descriptor}`")
            }
            DescriptorError::TooManyDimensions { descriptor } => write!(
                f,
                "descriptor `{descriptor}` exceeds {MAX_ARRAY_DIMENSIONS} array dimensions"
            ),
            DescriptorError::VoidNotAllowed { descriptor } => {
                write!(f, "`void` is only valid as a return type in `{descriptor}`")
            }
            DescriptorError::TrailingInput { descriptor, offset } => {
                write!(f, "trailing input at offset {offset} in descriptor `{descriptor}`")
            }
            DescriptorError::MissingParameterList { descriptor } => {
                write!(f, "method descriptor `{descriptor}` has no parameter list")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

/// Parse a field descriptor such as `I`, `[J` or `Ljava/lang/String;`.
pub fn parse_field_descriptor(desc: &str) -> Result<FieldDescriptor<'_>, DescriptorError> {
    if desc.is_empty() {
        return Err(DescriptorError::Empty);
    }
    let (ty, end) = parse_field_type(desc, 0)?;
    if ty.is_void() {
        return Err(DescriptorError::VoidNotAllowed {
            descriptor: desc.to_string(),
        });
    }
    if end != desc.len() {
        return Err(DescriptorError::TrailingInput {
            descriptor: desc.to_string(),
            offset: end,
        });
    }
    Ok(ty)
}

/// Parse a method descriptor such as `(ILjava/lang/String;)[I`.
pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor<'_>, DescriptorError> {
    if desc.is_empty() {
        return Err(DescriptorError::Empty);
    }
    if !desc.starts_with('(') {
        return Err(DescriptorError::MissingParameterList {
            descriptor: desc.to_string(),
        });
    }

    let bytes = desc.as_bytes();
    let mut offset = 1;
    let mut params = SmallVec::new();
    loop {
        match bytes.get(offset) {
            None => {
                return Err(DescriptorError::MissingParameterList {
                    descriptor: desc.to_string(),
                });
            }
            Some(b')') => {
                offset += 1;
                break;
            }
            Some(_) => {
                let (param, next) = parse_field_type(desc, offset)?;
                if param.is_void() {
                    return Err(DescriptorError::VoidNotAllowed {
                        descriptor: desc.to_string(),
                    });
                }
                params.push(param);
                offset = next;
            }
        }
    }

    if offset >= desc.len() {
        return Err(DescriptorError::UnexpectedChar {
            descriptor: desc.to_string(),
            offset,
        });
    }
    let (ret, end) = parse_field_type(desc, offset)?;
    if end != desc.len() {
        return Err(DescriptorError::TrailingInput {
            descriptor: desc.to_string(),
            offset: end,
        });
    }
    Ok(MethodDescriptor { params, ret })
}

/// Parses one field type starting at `start`; returns it and the offset just past it.
/// `void` is accepted here and rejected by callers where it is invalid.
fn parse_field_type(
    desc: &str,
    start: usize,
) -> Result<(FieldDescriptor<'_>, usize), DescriptorError> {
    let bytes = desc.as_bytes();
    let mut offset = start;
    while bytes.get(offset) == Some(&b'[') {
        offset += 1;
    }
    let dimensions = offset - start;
    if dimensions > MAX_ARRAY_DIMENSIONS {
        return Err(DescriptorError::TooManyDimensions {
            descriptor: desc.to_string(),
        });
    }

    let Some(&tag) = bytes.get(offset) else {
        return Err(DescriptorError::UnexpectedChar {
            descriptor: desc.to_string(),
            offset,
        });
    };

    let (base, end) = if tag == b'L' {
        let name_start = offset + 1;
        let Some(len) = desc[name_start..].find(';') else {
            return Err(DescriptorError::UnterminatedClassName {
                descriptor: desc.to_string(),
            });
        };
        if len == 0 {
            return Err(DescriptorError::UnexpectedChar {
                descriptor: desc.to_string(),
                offset: name_start,
            });
        }
        let name = &desc[name_start..name_start + len];
        (BaseType::Object(name), name_start + len + 1)
    } else if let Some(kind) = PrimitiveKind::from_descriptor_char(tag) {
        if kind == PrimitiveKind::Void && dimensions > 0 {
            return Err(DescriptorError::VoidNotAllowed {
                descriptor: desc.to_string(),
            });
        }
        (BaseType::Primitive(kind), offset + 1)
    } else {
        return Err(DescriptorError::UnexpectedChar {
            descriptor: desc.to_string(),
            offset,
        });
    };

    Ok((
        FieldDescriptor {
            dimensions: dimensions as u8,
            base,
        },
        end,
    ))
}

#[cfg(test)]
#[path = "../tests/descriptor_tests.rs"]
mod tests;
