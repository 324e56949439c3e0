//! The closed set of name and type codes the decoder can produce.
//!
//! The enum and its canonical text table are generated from one list so the
//! two cannot drift.

macro_rules! codes {
    ($(($variant:ident, $text:expr),)*) => {
        /// Tags for primitive types, aggregate keywords, operator names and
        /// MSVC compiler-generated entities.  [`Code::Undefined`] marks a
        /// name fragment that is a literal identifier rather than a code.
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub enum Code {
            #[default]
            $($variant,)*
        }

        /// Canonical text of a code.
        pub fn code_string(code: Code) -> &'static str {
            match code {
                $(Code::$variant => $text,)*
            }
        }
    };
}

codes! {
    (Undefined, ""),

    (Bool, "bool"),
    (SignedChar, "signed char"),
    (Char, "char"),
    (UnsignedChar, "unsigned char"),
    (Short, "short"),
    (UnsignedShort, "unsigned short"),
    (Int, "int"),
    (UnsignedInt, "unsigned int"),
    (Long, "long"),
    (UnsignedLong, "unsigned long"),
    (Float, "float"),
    (Double, "double"),
    (LongDouble, "long double"),

    (Int8, "int8_t"),
    (Uint8, "uint8_t"),
    (Int16, "int16_t"),
    (Uint16, "uint16_t"),
    (Int32, "int32_t"),
    (Uint32, "uint32_t"),
    (Int64, "int64_t"),
    (Uint64, "uint64_t"),
    (Char16, "char16_t"),
    (Char32, "char32_t"),
    (Wchar, "wchar_t"),

    (Int128, "__int128"),
    (Uint128, "unsigned __int128"),

    (Void, "void"),
    (Ellipsis, "..."),

    (Union, "union"),
    (Class, "class"),
    (Struct, "struct"),
    (Enum, "enum"),

    (Ctor, "`constructor'"),
    (Dtor, "`destructor'"),
    (OpNew, "operator new"),
    (OpDelete, "operator delete"),
    (OpAssign, "operator="),
    (OpRshift, "operator>>"),
    (OpLshift, "operator<<"),
    (OpNot, "operator!"),
    (OpEqual, "operator=="),
    (OpNotEqual, "operator!="),
    (OpIndex, "operator[]"),
    (OpType, "operator `type'"),
    (OpIndirect, "operator->"),
    (OpStar, "operator*"),
    (OpPlusPlus, "operator++"),
    (OpMinusMinus, "operator--"),
    (OpMinus, "operator-"),
    (OpPlus, "operator+"),
    (OpAmp, "operator&"),
    (OpIndirectMethod, "operator->*"),
    (OpDiv, "operator/"),
    (OpMod, "operator%"),
    (OpLess, "operator<"),
    (OpLessEq, "operator<="),
    (OpGreater, "operator>"),
    (OpGreaterEq, "operator>="),
    (OpComma, "operator,"),
    (OpCall, "operator()"),
    (OpBnot, "operator~"),
    (OpBxor, "operator^"),
    (OpBor, "operator|"),
    (OpAnd, "operator&&"),
    (OpOr, "operator||"),
    (OpStarAssign, "operator*="),
    (OpPlusAssign, "operator+="),
    (OpMinusAssign, "operator-="),
    (OpDivAssign, "operator/="),
    (OpModAssign, "operator%="),
    (OpRshiftAssign, "operator>>="),
    (OpLshiftAssign, "operator<<="),
    (OpAmpAssign, "operator&="),
    (OpBorAssign, "operator|="),
    (OpBxorAssign, "operator^="),
    (Vftable, "`vftable'"),
    (Vbtable, "`vbtable'"),
    (Vcall, "`vcall'"),
    (Typeof, "`typeof'"),
    (LocalStaticGuard, "`local static guard'"),
    (VbaseDtor, "`vbase destructor'"),
    (VectorDeletingDtor, "`vector deleting destructor'"),
    (DefaultCtorClosure, "`default constructor closure'"),
    (ScalarDeletingDtor, "`scalar deleting destructor'"),
    (VectorCtorIter, "`vector constructor iterator'"),
    (VectorDtorIter, "`vector destructor iterator'"),
    (VectorVbaseCtorIter, "`vector vbase constructor iterator'"),
    (VirtualDisplacementMap, "`virtual displacement map'"),
    (EhVectorCtorIter, "`eh vector constructor iterator'"),
    (EhVectorDtorIter, "`eh vector destructor iterator'"),
    (EhVectorVbaseCtorIter, "`eh vector vbase constructor iterator'"),
    (CopyCtorClosure, "`copy constructor closure'"),
    (UdtReturning, "`udt returning'"),
    (LocalVftable, "`local vftable'"),
    (LocalVftableCtorClosure, "`local vftable constructor closure'"),
    (OpNewArray, "operator new[]"),
    (OpDeleteArray, "operator delete[]"),
    (PlacementDeleteClosure, "`placement delete closure'"),
    (PlacementDeleteArrayClosure, "`placement delete[] closure'"),
    (ManagedVectorCtorIter, "`managed vector constructor iterator'"),
    (ManagedVectorDtorIter, "`managed vector destructor iterator'"),
    (EhVectorCopyCtorIter, "`eh vector copy constructor iterator'"),
    (EhVectorVbaseCopyCtorIter, "`eh vector vbase copy constructor iterator'"),
    (DynamicInitializer, "`dynamic initializer'"),
    (DynamicAtexitDtor, "`dynamic atexit destructor'"),
    (VectorCopyCtorIter, "`vector copy constructor iterator'"),
    (VectorVbaseCopyCtorIter, "`vector vbase copy constructor iterator'"),
    (ManagedVectorCopyCtorIter, "`managed vector copy constructor iterator'"),
    (LocalStaticThreadGuard, "`local static thread guard'"),
    (OpDquote, "operator\"\""),

    (RttiTypeDesc, "`RTTI Type Descriptor'"),
    (RttiBaseClassDesc, "`RTTI Base Class Descriptor'"),
    (RttiBaseClassArray, "`RTTI Base Class Array'"),
    (RttiClassHierarchyDesc, "`RTTI Class Hierarchy Descriptor'"),
    (RttiCompleteObjLocator, "`RTTI Complete Object Locator'"),
}
