//! Output attributes controlling the renderer.
//!
//! The set is a 32-bit bitfield on the wire; `BROKEN_UNDNAME` occupies the
//! high bit.  Two presets exist: [`Attributes::undname`], the closest
//! approximation of Microsoft's `undname.exe` (bugs included), and
//! [`Attributes::pretty`], tuned for human readers.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Attributes: u32 {
        /// Insert `, ` rather than `,` between arguments and parameters.
        const SPACE_AFTER_COMMA                            = 1;
        /// Emit `> >` rather than `>>` for adjacent closing brackets.
        const SPACE_BETWEEN_TEMPLATE_BRACKETS              = 1 << 1;
        /// Expand string literal payloads and quote their contents.
        const VERBOSE_CONSTANT_STRING                      = 1 << 2;
        /// Emit template parameters on the ctor/dtor spelling.
        const CDTOR_CLASS_TEMPLATE_PARAMETERS              = 1 << 3;
        /// `operator<T> U` rather than `operator U<T>`.
        const USER_DEFINED_CONVERSION_TEMPLATE_BEFORE_TYPE = 1 << 4;
        /// Emit the word `near` when the distance is near.
        const OUTPUT_NEAR                                  = 1 << 5;
        /// `__int64` rather than `std::int64_t`.
        const MS_SIMPLE_TYPES                              = 1 << 6;
        /// Prefix `[thunk]:` on thunk methods.
        const OUTPUT_THUNKS                                = 1 << 7;
        /// Emit `extern "C"` on marked symbols.
        const OUTPUT_EXTERN                                = 1 << 8;
        /// Include the anonymous-namespace hex identifier.
        const OUTPUT_ANONYMOUS_NUMBERS                     = 1 << 9;
        /// Drop cv-qualifiers on a pointer return value (undname quirk).
        const DISCARD_CV_ON_RETURN_POINTER                 = 1 << 10;
        /// Emit `__unaligned` and `__restrict`.
        const MS_QUALIFIERS                                = 1 << 11;
        /// Emit `__ptr64`.
        const OUTPUT_PTR64                                 = 1 << 12;
        /// Drop the `class`/`struct`/`union`/`enum` keywords.
        const DISABLE_PREFIXES                             = 1 << 13;
        /// Reproduce known undname.exe bugs (trailing `'`, stray ` }'`).
        const BROKEN_UNDNAME                               = 0x8000_0000;
    }
}

impl Attributes {
    /// Best approximation of Microsoft's `undname.exe` output.
    pub fn undname() -> Self {
        Attributes::CDTOR_CLASS_TEMPLATE_PARAMETERS
            | Attributes::MS_SIMPLE_TYPES
            | Attributes::OUTPUT_THUNKS
            | Attributes::OUTPUT_EXTERN
            | Attributes::DISCARD_CV_ON_RETURN_POINTER
            | Attributes::MS_QUALIFIERS
            | Attributes::OUTPUT_PTR64
            | Attributes::BROKEN_UNDNAME
    }

    /// Readable output.
    pub fn pretty() -> Self {
        Attributes::SPACE_AFTER_COMMA
            | Attributes::SPACE_BETWEEN_TEMPLATE_BRACKETS
            | Attributes::VERBOSE_CONSTANT_STRING
            | Attributes::CDTOR_CLASS_TEMPLATE_PARAMETERS
            | Attributes::OUTPUT_ANONYMOUS_NUMBERS
            | Attributes::OUTPUT_THUNKS
            | Attributes::OUTPUT_EXTERN
    }

    /// Every flag with its description, in bit order.
    pub fn explain() -> Vec<(Attributes, &'static str)> {
        vec![
            (Attributes::SPACE_AFTER_COMMA, "insert a space after commas"),
            (
                Attributes::SPACE_BETWEEN_TEMPLATE_BRACKETS,
                "separate adjacent closing template brackets",
            ),
            (
                Attributes::VERBOSE_CONSTANT_STRING,
                "expand string literal payloads",
            ),
            (
                Attributes::CDTOR_CLASS_TEMPLATE_PARAMETERS,
                "emit template parameters on constructor and destructor names",
            ),
            (
                Attributes::USER_DEFINED_CONVERSION_TEMPLATE_BEFORE_TYPE,
                "emit conversion operator template parameters before the target type",
            ),
            (Attributes::OUTPUT_NEAR, "emit the word near"),
            (
                Attributes::MS_SIMPLE_TYPES,
                "use __int64-style names for fixed-width types",
            ),
            (Attributes::OUTPUT_THUNKS, "prefix [thunk]: on thunk methods"),
            (Attributes::OUTPUT_EXTERN, "emit extern \"C\""),
            (
                Attributes::OUTPUT_ANONYMOUS_NUMBERS,
                "include anonymous namespace identifiers",
            ),
            (
                Attributes::DISCARD_CV_ON_RETURN_POINTER,
                "drop cv-qualifiers on pointer return values",
            ),
            (
                Attributes::MS_QUALIFIERS,
                "emit __unaligned and __restrict",
            ),
            (Attributes::OUTPUT_PTR64, "emit __ptr64"),
            (
                Attributes::DISABLE_PREFIXES,
                "drop class/struct/union/enum keywords",
            ),
            (
                Attributes::BROKEN_UNDNAME,
                "reproduce known undname.exe bugs",
            ),
        ]
    }
}
