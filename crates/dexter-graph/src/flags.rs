//! Access flags and class origin.

use bitflags::bitflags;

/// JVM access flags shared by classes, methods and fields.
///
/// Several bits are overloaded in the class file format (`0x0020` is
/// `ACC_SUPER` on classes and `ACC_SYNCHRONIZED` on methods); the method
/// reading is used here since only member flags drive resolution.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct AccessFlags(u16);

bitflags! {
    impl AccessFlags: u16 {
        const PUBLIC = 0x0001;       // Accessible from outside its package.
        const PRIVATE = 0x0002;      // Usable only within the defining class.
        const PROTECTED = 0x0004;    // Accessible within subclasses.
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;       // Compiler-generated bridge method.
        const VARARGS = 0x0080;      // Declared with variable number of arguments.
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;    // Not present in the source code.
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    #[inline]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    #[inline]
    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    #[inline]
    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    #[inline]
    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    #[inline]
    pub const fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    /// Variable-arity native methods are the shape the JVM reserves for
    /// signature-polymorphic methods.
    #[inline]
    pub const fn is_varargs_native(self) -> bool {
        self.contains(Self::VARARGS.union(Self::NATIVE))
    }
}

/// Where a class definition came from.
///
/// Program classes are optimized and may be rewritten; classpath and library
/// classes are only consulted for resolution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClassKind {
    #[default]
    Program,
    Classpath,
    Library,
}

impl ClassKind {
    #[inline]
    pub const fn is_program(self) -> bool {
        matches!(self, ClassKind::Program)
    }
}
