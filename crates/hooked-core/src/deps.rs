use std::any::Any;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// A value that can take part in a dependency list.
pub trait DepValue: Any {
    fn dep_eq(&self, other: &dyn DepValue) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: PartialEq + 'static> DepValue for T {
    fn dep_eq(&self, other: &dyn DepValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ordered list of dependency values, compared shallowly with `PartialEq`.
///
/// Build one with [`deps!`](crate::deps!) or `Deps::new().with(..)`.
#[derive(Clone, Default)]
pub struct Deps(SmallVec<[Rc<dyn DepValue>; 4]>);

impl Deps {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn with<T: PartialEq + 'static>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: PartialEq + 'static>(&mut self, value: T) {
        self.0.push(Rc::new(value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Deps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deps(len = {})", self.0.len())
    }
}

/// `deps![a, b, c]` builds a [`Deps`] list; `deps![]` is the empty list.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Deps::new()$(.with($value))+
    };
}

/// `false` when there is nothing to compare against, when lengths differ, or
/// at the first pair that is not equal. Values of different types never match.
pub fn are_deps_equal(next: &Deps, prev: Option<&Deps>) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if next.0.len() != prev.0.len() {
        return false;
    }
    next.0
        .iter()
        .zip(prev.0.iter())
        .all(|(a, b)| DepValue::dep_eq(&**a, &**b))
}
