use std::rc::Rc;

/// A render function plus the props it renders with.
///
/// `render` is called inside an open hook session, so it may call hook
/// primitives.
pub trait Component: 'static {
    type Props: 'static;
    type Output: 'static;

    fn render(&self, props: &Self::Props) -> Self::Output;

    /// Called when new props arrive; `false` skips the re-render.
    fn should_update(&self, _old: &Self::Props, _new: &Self::Props) -> bool {
        true
    }

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// [`Component`] made from a closure.
pub struct FunctionComponent<P: 'static, R: 'static> {
    name: &'static str,
    render: Rc<dyn Fn(&P) -> R>,
    should_update: Option<Rc<dyn Fn(&P, &P) -> bool>>,
}

impl<P: 'static, R: 'static> Clone for FunctionComponent<P, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            render: self.render.clone(),
            should_update: self.should_update.clone(),
        }
    }
}

impl<P: 'static, R: 'static> FunctionComponent<P, R> {
    pub fn new(name: &'static str, render: impl Fn(&P) -> R + 'static) -> Self {
        Self {
            name,
            render: Rc::new(render),
            should_update: None,
        }
    }

    /// Skips re-rendering when the new props equal the old ones. State and
    /// context changes still re-render.
    pub fn pure(name: &'static str, render: impl Fn(&P) -> R + 'static) -> Self
    where
        P: PartialEq,
    {
        Self {
            name,
            render: Rc::new(render),
            should_update: Some(Rc::new(|old: &P, new: &P| old != new)),
        }
    }
}

impl<P: 'static, R: 'static> Component for FunctionComponent<P, R> {
    type Props = P;
    type Output = R;

    fn render(&self, props: &P) -> R {
        (self.render)(props)
    }

    fn should_update(&self, old: &P, new: &P) -> bool {
        self.should_update.as_ref().is_none_or(|f| (**f)(old, new))
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub fn component<P: 'static, R: 'static>(
    name: &'static str,
    render: impl Fn(&P) -> R + 'static,
) -> FunctionComponent<P, R> {
    FunctionComponent::new(name, render)
}

pub fn pure<P: PartialEq + 'static, R: 'static>(
    name: &'static str,
    render: impl Fn(&P) -> R + 'static,
) -> FunctionComponent<P, R> {
    FunctionComponent::pure(name, render)
}
