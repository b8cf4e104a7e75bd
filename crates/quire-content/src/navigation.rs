//! Category and subcategory grouping of posts.

use serde::Serialize;

use crate::post::Post;

/// Posts grouped by category, then by optional subcategory.
///
/// Categories and subcategories appear in the order they are first
/// encountered in the source sequence; posts keep their source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationTree<'a> {
    pub categories: Vec<CategoryNode<'a>>,
}

/// A top-level category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode<'a> {
    /// Category name
    pub name: String,
    /// Posts without a subcategory
    pub posts: Vec<&'a Post>,
    /// Named groups beneath this category
    pub subcategories: Vec<SubcategoryNode<'a>>,
}

/// A named group of posts beneath a category.
#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryNode<'a> {
    pub name: String,
    pub posts: Vec<&'a Post>,
}

impl<'a> NavigationTree<'a> {
    /// Group `posts` in a single pass without reordering.
    pub fn build(posts: &'a [Post]) -> Self {
        let mut tree = Self::default();

        for post in posts {
            let category = tree.category_mut(&post.category);

            match &post.subcategory {
                Some(sub) => category.subcategory_mut(sub).posts.push(post),
                None => category.posts.push(post),
            }
        }

        tree
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&CategoryNode<'a>> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Total number of posts placed in the tree.
    pub fn post_count(&self) -> usize {
        self.categories.iter().map(CategoryNode::post_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn category_mut(&mut self, name: &str) -> &mut CategoryNode<'a> {
        let index = match self.categories.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.categories.push(CategoryNode {
                    name: name.to_string(),
                    posts: Vec::new(),
                    subcategories: Vec::new(),
                });
                self.categories.len() - 1
            }
        };

        &mut self.categories[index]
    }
}

impl<'a> CategoryNode<'a> {
    /// Look up a subcategory by name.
    pub fn subcategory(&self, name: &str) -> Option<&SubcategoryNode<'a>> {
        self.subcategories.iter().find(|s| s.name == name)
    }

    /// Posts directly under the category plus those in its subcategories.
    pub fn post_count(&self) -> usize {
        self.posts.len() + self.subcategories.iter().map(|s| s.posts.len()).sum::<usize>()
    }

    fn subcategory_mut(&mut self, name: &str) -> &mut SubcategoryNode<'a> {
        let index = match self.subcategories.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.subcategories.push(SubcategoryNode {
                    name: name.to_string(),
                    posts: Vec::new(),
                });
                self.subcategories.len() - 1
            }
        };

        &mut self.subcategories[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn post(id: &str, category: &str, subcategory: Option<&str>) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            content: String::new(),
            filename: format!("{}.md", id),
        }
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn groups_by_category_and_subcategory() {
        let posts = vec![
            post("beta", "Tech", Some("Notes")),
            post("alpha", "Tech", None),
        ];

        let tree = NavigationTree::build(&posts);

        assert_eq!(tree.categories.len(), 1);
        let tech = tree.category("Tech").unwrap();
        assert_eq!(ids(&tech.posts), vec!["alpha"]);
        assert_eq!(ids(&tech.subcategory("Notes").unwrap().posts), vec!["beta"]);
    }

    #[test]
    fn keeps_first_encounter_order() {
        let posts = vec![
            post("1", "Life", None),
            post("2", "Tech", Some("Rust")),
            post("3", "Life", Some("Travel")),
            post("4", "Tech", Some("Go")),
            post("5", "Tech", Some("Rust")),
            post("6", "Art", None),
        ];

        let tree = NavigationTree::build(&posts);

        let names: Vec<_> = tree.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Life", "Tech", "Art"]);

        let tech = tree.category("Tech").unwrap();
        let subs: Vec<_> = tech.subcategories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, vec!["Rust", "Go"]);
        assert_eq!(ids(&tech.subcategory("Rust").unwrap().posts), vec!["2", "5"]);
        assert!(tech.posts.is_empty());
    }

    #[test]
    fn every_post_is_placed_once() {
        let posts: Vec<Post> = (0..20)
            .map(|i| {
                let category = ["A", "B", "C"][i % 3];
                let sub = match i % 4 {
                    0 => None,
                    1 => Some("x"),
                    _ => Some("y"),
                };
                post(&i.to_string(), category, sub)
            })
            .collect();

        let tree = NavigationTree::build(&posts);

        assert_eq!(tree.post_count(), posts.len());
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = NavigationTree::build(&[]);

        assert!(tree.is_empty());
        assert_eq!(tree.post_count(), 0);
    }
}
