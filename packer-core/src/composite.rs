//! The table shape rule from spec §4.4: splitting a flat key-value
//! space into an array part (the longest consecutive run of integer
//! keys starting at 1) and a hash part (everything else). The actual
//! recursive tag/length/element encode-decode for [`crate::value::Table`]
//! lives in [`crate::walker`], since it needs to call back into the
//! walker for each element; this module is the pure, non-recursive
//! part spec §4.4 calls "Determining n".

use crate::value::{Table, Value};

impl Table {
    /// Builds a [`Table`] from a flat, unordered key-value space (e.g.
    /// what a JSON object or a Lua table literal would hand you),
    /// applying spec invariant 4: the array part is the longest prefix
    /// `[1..n]` with no missing indices; everything else -- string
    /// keys, out-of-sequence or non-integer numeric keys, boolean
    /// keys, and any gap in the integer run -- goes to the hash part.
    pub fn from_flat(entries: Vec<(Value, Value)>) -> Table {
        let mut by_index = std::collections::BTreeMap::new();
        let mut rest = Vec::new();
        for (k, v) in entries {
            match &k {
                Value::Integer(i) if *i >= 1 => {
                    by_index.insert(*i, v);
                }
                _ => rest.push((k, v)),
            }
        }

        let mut array = Vec::new();
        let mut next = 1_i64;
        while let Some(v) = by_index.remove(&next) {
            array.push(v);
            next += 1;
        }
        // Whatever integer keys remain (gaps beyond the prefix) join
        // the hash part alongside the non-integer keys already
        // collected above.
        let mut hash: Vec<(Value, Value)> =
            by_index.into_iter().map(|(i, v)| (Value::Integer(i), v)).collect();
        hash.extend(rest);

        Table { array, hash }
    }
}
