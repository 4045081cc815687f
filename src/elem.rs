//! `Elem`: the closed set of payload kinds usable as keys and values.
//!
//! String and opaque payloads sit behind `Rc`, so cloning an `Elem` (as the
//! `keys()`/`values()` snapshots do) shares the payload instead of copying
//! it. A container drops the `Elem`s it stores; the payload itself lives as
//! long as anyone still holds a clone.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Elem {
    Int(i32),
    UInt(u32),
    Bool(bool),
    Float(f32),
    Str(Rc<str>),
    Ptr(Rc<dyn Any>),
}

impl Elem {
    /// Wrap an arbitrary value as an opaque, identity-compared payload.
    pub fn ptr<T: Any>(value: T) -> Self {
        Elem::Ptr(Rc::new(value))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Elem::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Elem::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Elem::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Elem::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Elem::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn downcast_ptr<T: Any>(&self) -> Option<&T> {
        match self {
            Elem::Ptr(p) => p.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Elem {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Elem::Int(a), Elem::Int(b)) => a == b,
            (Elem::UInt(a), Elem::UInt(b)) => a == b,
            (Elem::Bool(a), Elem::Bool(b)) => a == b,
            (Elem::Float(a), Elem::Float(b)) => a == b,
            (Elem::Str(a), Elem::Str(b)) => a == b,
            (Elem::Ptr(a), Elem::Ptr(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Elem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elem::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Elem::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Elem::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Elem::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Elem::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Elem::Ptr(p) => write!(f, "Ptr({:p})", Rc::as_ptr(p) as *const ()),
        }
    }
}

impl From<i32> for Elem {
    fn from(v: i32) -> Self {
        Elem::Int(v)
    }
}

impl From<u32> for Elem {
    fn from(v: u32) -> Self {
        Elem::UInt(v)
    }
}

impl From<bool> for Elem {
    fn from(v: bool) -> Self {
        Elem::Bool(v)
    }
}

impl From<f32> for Elem {
    fn from(v: f32) -> Self {
        Elem::Float(v)
    }
}

impl From<&str> for Elem {
    fn from(s: &str) -> Self {
        Elem::Str(Rc::from(s))
    }
}

impl From<String> for Elem {
    fn from(s: String) -> Self {
        Elem::Str(Rc::from(s))
    }
}

impl From<Rc<str>> for Elem {
    fn from(s: Rc<str>) -> Self {
        Elem::Str(s)
    }
}

/// K&R multiplicative string hash reduced into `[0, i32::MAX)`.
///
/// Bytes are folded as signed chars, so bytes of non-ASCII text are
/// sign-extended before they are added.
pub fn string_knr_hash(s: &str) -> i64 {
    let h = s.bytes().fold(0u64, |acc, b| {
        acc.wrapping_mul(31)
            .wrapping_add(i64::from(b as i8) as u64)
    });
    (h % i32::MAX as u64) as i64
}

pub fn int_hash(v: i32) -> i64 {
    i64::from(v)
}

/// Hash for any `Elem`. A result `<= 0` makes the element unusable as a key:
/// this covers non-positive integers, `0.0`, and the empty string.
pub fn elem_hash(e: &Elem) -> i64 {
    match e {
        Elem::Int(v) => int_hash(*v),
        Elem::UInt(v) => i64::from(*v),
        Elem::Bool(b) => {
            if *b {
                2
            } else {
                1
            }
        }
        // -0.0 == 0.0, so both map to the same (invalid) hash.
        Elem::Float(v) if *v == 0.0 => 0,
        Elem::Float(v) => i64::from(v.to_bits()),
        Elem::Str(s) => string_knr_hash(s),
        Elem::Ptr(p) => addr_hash(Rc::as_ptr(p) as *const () as usize as u64),
    }
}

/// Address hash in `[1, i32::MAX)`; every live pointer is a valid key.
fn addr_hash(addr: u64) -> i64 {
    (addr % (i32::MAX as u64 - 1) + 1) as i64
}

pub fn elem_eq(a: &Elem, b: &Elem) -> bool {
    a == b
}
