use derive_more::{Deref, DerefMut};

use crate::content::{Page, Post};

/// Posts, newest first.
#[derive(Debug, Default, Clone, Deref, DerefMut)]
pub struct Posts(pub(crate) Vec<Post>);

impl Posts {
    pub fn by_slug(&self, slug: &str) -> Option<&Post> {
        self.0.iter().find(|post| post.slug == slug)
    }
}

#[derive(Debug, Default, Clone, Deref, DerefMut)]
pub struct Pages(pub(crate) Vec<Page>);

impl Pages {
    pub fn by_slug(&self, slug: &str) -> Option<&Page> {
        self.0.iter().find(|page| page.slug == slug)
    }
}
