//! Core item identifiers: types, protos and member signatures.
//!
//! All of these are small `Copy` handles into the [`crate::TypeInterner`].
//! Equality is identity: two `TypeId`s are equal iff they denote the same
//! interned type, so hierarchy queries never compare descriptor strings.

use dexter_common::Atom;
use dexter_common::limits::INLINE_PROTO_PARAMS;
use smallvec::SmallVec;

// =============================================================================
// TypeId
// =============================================================================

/// Interned handle for a class, interface, primitive or array type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const BYTE: TypeId = TypeId(2);
    pub const CHAR: TypeId = TypeId(3);
    pub const SHORT: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const LONG: TypeId = TypeId(6);
    pub const FLOAT: TypeId = TypeId(7);
    pub const DOUBLE: TypeId = TypeId(8);

    /// `java.lang.Object`, the root of every class hierarchy.
    pub const OBJECT: TypeId = TypeId(9);

    /// First id handed out for types interned after construction.
    pub const FIRST_DYNAMIC: u32 = 10;

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 <= Self::DOUBLE.0
    }
}

/// The nine primitive kinds of the JVM type system (including `void`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Void,
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            PrimitiveKind::Void => TypeId::VOID,
            PrimitiveKind::Boolean => TypeId::BOOLEAN,
            PrimitiveKind::Byte => TypeId::BYTE,
            PrimitiveKind::Char => TypeId::CHAR,
            PrimitiveKind::Short => TypeId::SHORT,
            PrimitiveKind::Int => TypeId::INT,
            PrimitiveKind::Long => TypeId::LONG,
            PrimitiveKind::Float => TypeId::FLOAT,
            PrimitiveKind::Double => TypeId::DOUBLE,
        }
    }

    pub const fn descriptor_char(self) -> char {
        match self {
            PrimitiveKind::Void => 'V',
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
        }
    }

    pub const fn from_descriptor_char(c: u8) -> Option<PrimitiveKind> {
        match c {
            b'V' => Some(PrimitiveKind::Void),
            b'Z' => Some(PrimitiveKind::Boolean),
            b'B' => Some(PrimitiveKind::Byte),
            b'C' => Some(PrimitiveKind::Char),
            b'S' => Some(PrimitiveKind::Short),
            b'I' => Some(PrimitiveKind::Int),
            b'J' => Some(PrimitiveKind::Long),
            b'F' => Some(PrimitiveKind::Float),
            b'D' => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    pub const fn java_name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

/// Structural representation behind a [`TypeId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Primitive(PrimitiveKind),
    /// Class or interface, keyed by its interned descriptor (`Ljava/lang/Object;`).
    Class(Atom),
    /// Array type carrying its element type.
    Array(TypeId),
}

// =============================================================================
// Protos and member signatures
// =============================================================================

/// Interned handle for a [`MethodProto`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProtoId(pub u32);

/// Parameter and return types of a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodProto {
    pub params: SmallVec<[TypeId; INLINE_PROTO_PARAMS]>,
    pub ret: TypeId,
}

impl MethodProto {
    pub fn new(params: impl IntoIterator<Item = TypeId>, ret: TypeId) -> Self {
        Self {
            params: params.into_iter().collect(),
            ret,
        }
    }
}

/// Holder-independent method signature: name plus proto.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub name: Atom,
    pub proto: ProtoId,
}

/// Holder-independent field signature: name plus type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldSig {
    pub name: Atom,
    pub ty: TypeId,
}

/// Key of a per-type member table.
///
/// Methods and fields live in separate namespaces on the JVM; a field and a
/// method with the same name never collide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKey {
    Method(MethodSig),
    Field(FieldSig),
}

impl From<MethodSig> for MemberKey {
    fn from(sig: MethodSig) -> Self {
        MemberKey::Method(sig)
    }
}

impl From<FieldSig> for MemberKey {
    fn from(sig: FieldSig) -> Self {
        MemberKey::Field(sig)
    }
}

/// A symbolic method reference: signature plus the type it was written against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub holder: TypeId,
    pub sig: MethodSig,
}

impl MethodRef {
    pub const fn new(holder: TypeId, sig: MethodSig) -> Self {
        Self { holder, sig }
    }

    #[inline]
    pub const fn name(&self) -> Atom {
        self.sig.name
    }
}

/// A symbolic field reference: signature plus the type it was written against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub holder: TypeId,
    pub sig: FieldSig,
}

impl FieldRef {
    pub const fn new(holder: TypeId, sig: FieldSig) -> Self {
        Self { holder, sig }
    }

    #[inline]
    pub const fn name(&self) -> Atom {
        self.sig.name
    }
}
