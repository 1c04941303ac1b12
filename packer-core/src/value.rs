/// The dynamically-typed value this crate transports. See the module
/// docs on [`crate`] for the wire format that carries it.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    /// An integer in `-(2^51) ..= 2^52 - 1` -- the range is asymmetric
    /// because the widest negative tag stores its magnitude in the same
    /// 52 bits a positive value of that width would use, and a sign bit
    /// has no separate encoding of its own. Values outside that range
    /// still construct (so a caller doesn't have to fallibly convert
    /// every `i64`), but encoding one is a [`crate::error::CodecError::UnsupportedType`]:
    /// there is no lossless tagged-integer width wide enough to hold it
    /// under spec, and silently falling back to [`Value::Double`] would
    /// violate the invariant that an `Integer` never decodes back as a
    /// `Double`.
    Integer(i64),
    Double(f64),
    String(Vec<u8>),
    Buffer(Vec<u8>),
    Table(Table),
}

impl Value {
    pub fn int(i: impl Into<i64>) -> Value {
        Value::Integer(i.into())
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::String(s.into().into_bytes())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// A table is an ordered array part `array[1..n]` plus an unordered
/// (but iteration-stable within one encode) hash part mapping any
/// non-`Nil` scalar key to a value. See spec invariant 4: the array
/// part is the longest run of consecutive integer keys starting at 1;
/// everything else -- string keys, out-of-sequence or non-integer
/// numeric keys, boolean keys, sparse gaps -- lives in the hash part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub array: Vec<Value>,
    pub hash: Vec<(Value, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn push(&mut self, v: Value) {
        self.array.push(v);
    }

    pub fn insert(&mut self, k: Value, v: Value) {
        if let Some(slot) = self.hash.iter_mut().find(|(ek, _)| *ek == k) {
            slot.1 = v;
        } else {
            self.hash.push((k, v));
        }
    }

    pub fn get(&self, k: &Value) -> Option<&Value> {
        if let Value::Integer(i) = k {
            if *i >= 1 && (*i as usize) <= self.array.len() {
                return Some(&self.array[*i as usize - 1]);
            }
        }
        self.hash.iter().find(|(ek, _)| ek == k).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.array.len() + self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty() && self.hash.is_empty()
    }
}
