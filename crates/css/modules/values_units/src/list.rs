//! Ordered value lists for multi-value attributes.

use core::fmt;
use core::slice;

use smallvec::{SmallVec, smallvec};

use crate::{GlobalKeyword, Value};

/// An ordered, possibly single-element sequence of values.
///
/// Insertion order is significant, and index 0 carries keyword significance:
/// a one-element list holding `inherit` means the whole attribute inherits.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueList(SmallVec<[Value; 2]>);

impl ValueList {
    /// The list holding only the no-declaration sentinel.
    #[inline]
    pub fn no_declaration() -> Self {
        Self::single(Value::NoDeclaration)
    }

    #[inline]
    pub fn single(value: Value) -> Self {
        Self(smallvec![value])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First value; the no-declaration sentinel for an empty list.
    #[inline]
    pub fn first(&self) -> &Value {
        static EMPTY: Value = Value::NoDeclaration;
        self.0.first().unwrap_or(&EMPTY)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// True when nothing was declared: empty, or only the sentinel.
    pub fn is_no_declaration(&self) -> bool {
        match self.0.as_slice() {
            [] => true,
            [only] => only.is_no_declaration(),
            _ => false,
        }
    }

    /// The CSS-wide keyword, but only when it is the whole list.
    pub fn global_keyword(&self) -> Option<GlobalKeyword> {
        match self.0.as_slice() {
            [only] => only.global_keyword(),
            _ => None,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Default for ValueList {
    #[inline]
    fn default() -> Self {
        Self::no_declaration()
    }
}

impl From<Value> for ValueList {
    #[inline]
    fn from(value: Value) -> Self {
        Self::single(value)
    }
}

impl From<Vec<Value>> for ValueList {
    #[inline]
    fn from(values: Vec<Value>) -> Self {
        Self(SmallVec::from_vec(values))
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'list> IntoIterator for &'list ValueList {
    type Item = &'list Value;
    type IntoIter = slice::Iter<'list, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            value.fmt(formatter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_only_counts_for_single_element_lists() {
        assert_eq!(
            ValueList::single(Value::INHERIT).global_keyword(),
            Some(GlobalKeyword::Inherit)
        );
        let list = ValueList::from(vec![Value::INHERIT, Value::ident("serif")]);
        assert_eq!(list.global_keyword(), None);
    }

    #[test]
    fn empty_and_sentinel_lists_are_undeclared() {
        assert!(ValueList::default().is_no_declaration());
        assert!(ValueList::from(Vec::new()).is_no_declaration());
        assert!(!ValueList::single(Value::AUTO).is_no_declaration());
    }
}
