//! Layout and master proxies bound to a deck under construction.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::adapter::PlaceholderContent;
use crate::builder::SlideBuilder;
use crate::error::Result;
use crate::template::layout::SlideLayout;
use crate::template::master::{BoundLayout, LayoutDescriptor, SlideMaster};

/// A declared layout type bound to the backend layout at its position.
///
/// [`with`](Self::with) fills the placeholders from a layout value;
/// [`builder`](Self::builder) leaves them as the layout has them. A failed
/// binding is reported when the slide is added.
pub struct SlideLayoutProxy<L> {
    target: Result<BoundLayout>,
    _layout: PhantomData<fn() -> L>,
}

impl<L: SlideLayout> SlideLayoutProxy<L> {
    pub(crate) fn new(target: Result<BoundLayout>) -> Self {
        Self {
            target,
            _layout: PhantomData,
        }
    }

    /// The bound backend layout, if binding succeeded.
    pub fn target(&self) -> Option<&BoundLayout> {
        self.target.as_ref().ok()
    }

    /// A slide builder whose placeholders take the values of `layout`.
    pub fn with(self, layout: L) -> SlideBuilder {
        SlideBuilder::from_binding(self.target, Some(layout.placeholder_values()))
    }

    pub fn builder(self) -> SlideBuilder {
        SlideBuilder::from_binding(self.target, None)
    }
}

impl<L: SlideLayout> From<SlideLayoutProxy<L>> for SlideBuilder {
    fn from(proxy: SlideLayoutProxy<L>) -> Self {
        proxy.builder()
    }
}

impl<L> fmt::Debug for SlideLayoutProxy<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideLayoutProxy")
            .field("layout", &std::any::type_name::<L>())
            .field("target", &self.target)
            .finish()
    }
}

/// A layout looked up by field name at run time.
#[derive(Debug, Clone)]
pub struct DynLayoutProxy {
    descriptor: LayoutDescriptor,
    target: BoundLayout,
}

impl DynLayoutProxy {
    pub fn descriptor(&self) -> &LayoutDescriptor {
        &self.descriptor
    }

    pub fn target(&self) -> &BoundLayout {
        &self.target
    }

    /// A slide builder filling the placeholders positionally with `values`.
    pub fn with_values<I, V>(self, values: I) -> SlideBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<PlaceholderContent>,
    {
        let values = values.into_iter().map(Into::into).collect();
        SlideBuilder::from_binding(Ok(self.target), Some(values))
    }

    pub fn builder(self) -> SlideBuilder {
        SlideBuilder::from_binding(Ok(self.target), None)
    }
}

impl From<DynLayoutProxy> for SlideBuilder {
    fn from(proxy: DynLayoutProxy) -> Self {
        proxy.builder()
    }
}

/// A declared master bound to the deck a
/// [`PresentationBuilder`](crate::builder::PresentationBuilder) is building.
///
/// Dereferences to the master, so the typed layout accessors generated by
/// [`slide_master!`](crate::slide_master) are available directly.
#[derive(Debug)]
pub struct SlideMasterProxy<M> {
    master: M,
}

impl<M: SlideMaster> SlideMasterProxy<M> {
    pub fn new(master: M) -> Self {
        Self { master }
    }

    pub fn master(&self) -> &M {
        &self.master
    }

    /// The layout declared as field `name`, bound to its backend layout.
    pub fn layout(&self, name: &str) -> Result<DynLayoutProxy> {
        let descriptor = M::layout_field(name)?;
        let target = self.master.binding().resolve(
            descriptor.index,
            descriptor.type_name,
            descriptor.backend_name,
        )?;
        Ok(DynLayoutProxy { descriptor, target })
    }
}

impl<M> Deref for SlideMasterProxy<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.master
    }
}
