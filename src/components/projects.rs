//! Project grid rendering and tag filtering

use crate::catalog::{self, tags_match, ProjectRecord, FILTER_ALL};
use crate::component::{Component, ComponentBase};
use crate::config::Config;
use crate::dom::{NodeId, Page};
use anyhow::Context;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn show_card(page: &Page, card: NodeId) {
    page.set_style(card, "display", "block");
    page.set_style(card, "opacity", "1");
    page.set_style(card, "transform", "translateY(0)");
    page.set_style(card, "animation", "fadeInUp 0.5s ease-out");
}

fn hide_card(page: &Page, card: NodeId) {
    page.set_style(card, "display", "none");
    page.set_style(card, "opacity", "0");
    page.set_style(card, "transform", "translateY(20px)");
}

/// Show the cards whose tag set contains `filter`, hide the rest
fn filter_cards(page: &Page, card_selector: &str, filter: &str) {
    for card in page.query_all(card_selector) {
        let tags = page.attribute(card, "data-tags").unwrap_or_default();
        if tags_match(&tags, filter) {
            show_card(page, card);
        } else {
            hide_card(page, card);
        }
    }
}

/// Build one `.project-card` subtree (detached)
pub fn render_card(page: &Page, project: &ProjectRecord) -> NodeId {
    let card = page
        .build("div")
        .class("project-card")
        .attr("data-tags", &project.data_tags())
        .finish();

    let image = page.build("div").class("project-image").append_to(card);
    if let Some(file) = &project.image {
        page.build("img")
            .attr("src", &format!("images/{file}"))
            .attr("alt", &project.name)
            .attr("loading", "lazy")
            .append_to(image);
        page.build("i")
            .class("fab")
            .class("fa-github")
            .style("display", "none")
            .append_to(image);
    } else {
        page.build("i").class("fab").class("fa-github").append_to(image);
    }

    let content = page.build("div").class("project-content").append_to(card);
    let header = page
        .build("div")
        .class("project-header")
        .child("h3", |h| h.class("project-title").text(&project.name))
        .append_to(content);
    let tags = page.build("div").class("project-tags").append_to(header);
    for tag in &project.tags {
        page.build("span").class("project-tag").text(tag).append_to(tags);
    }

    page.build("p")
        .class("project-description")
        .text(&project.description)
        .append_to(content);

    let tech = page.build("div").class("project-tech").append_to(content);
    for item in &project.tech_stack {
        page.build("span").class("tech-tag").text(item).append_to(tech);
    }

    let links = page.build("div").class("project-links").append_to(content);
    page.build("a")
        .class("project-link")
        .attr("href", &project.links.code)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .child("i", |i| i.class("fab").class("fa-github"))
        .text(" Code")
        .append_to(links);
    if let Some(demo) = &project.links.demo {
        page.build("a")
            .class("project-link")
            .attr("href", demo)
            .attr("target", "_blank")
            .attr("rel", "noopener")
            .child("i", |i| i.class("fas").class("fa-external-link-alt"))
            .text(" Demo")
            .append_to(links);
    }

    card
}

pub struct ProjectsComponent {
    base: ComponentBase,
    grid: Option<NodeId>,
    filter_buttons: Rc<Vec<NodeId>>,
    projects: Option<Vec<ProjectRecord>>,
    current_filter: Rc<RefCell<String>>,
}

impl ProjectsComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        Self {
            base: ComponentBase::new(config, page),
            grid: None,
            filter_buttons: Rc::new(Vec::new()),
            projects: None,
            current_filter: Rc::new(RefCell::new(FILTER_ALL.to_string())),
        }
    }

    /// Render `projects` instead of the bundled catalog
    pub fn with_projects(mut self, projects: Vec<ProjectRecord>) -> Self {
        self.projects = Some(projects);
        self
    }

    pub fn current_filter(&self) -> String {
        self.current_filter.borrow().clone()
    }

    /// Apply `filter` to the rendered cards
    pub fn filter_projects(&self, filter: &str) {
        *self.current_filter.borrow_mut() = filter.to_string();
        filter_cards(
            self.base.page(),
            &self.base.config().selectors.project_cards,
            filter,
        );
    }

    fn display_projects(&self, projects: &[ProjectRecord]) {
        let Some(grid) = self.grid else {
            return;
        };
        let page = self.base.page();
        page.set_text(grid, "");
        for project in projects {
            let card = render_card(page, project);
            page.append_child(grid, card);
        }
        tracing::debug!(count = projects.len(), "projects rendered");
    }
}

impl Component for ProjectsComponent {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup_dom(&mut self) -> anyhow::Result<()> {
        let selectors = &self.base.config().selectors;
        self.grid = self.base.query(&selectors.projects_grid);
        self.filter_buttons = Rc::new(self.base.query_all(&selectors.filter_buttons));
        Ok(())
    }

    fn bind_events(&mut self) -> anyhow::Result<()> {
        let buttons = self.filter_buttons.clone();
        for button in buttons.iter().copied() {
            let page = self.base.page().clone();
            let card_selector = self.base.config().selectors.project_cards.clone();
            let all_buttons = buttons.clone();
            let current = self.current_filter.clone();

            self.base.listen(Some(button), "click", move |e| {
                e.prevent_default();
                let filter = page
                    .attribute(button, "data-filter")
                    .unwrap_or_else(|| FILTER_ALL.to_string());
                for other in all_buttons.iter() {
                    page.remove_class(*other, "active");
                }
                page.add_class(button, "active");

                filter_cards(&page, &card_selector, &filter);
                *current.borrow_mut() = filter;
            });
        }
        Ok(())
    }

    fn after_init(&mut self) -> anyhow::Result<()> {
        let projects = match self.projects.take() {
            Some(projects) => projects,
            None => catalog::bundled().context("bundled project catalog is malformed")?,
        };
        self.display_projects(&projects);
        self.projects = Some(projects);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProjectLinks;

    fn projects_page() -> (Page, NodeId, Vec<NodeId>) {
        let page = Page::in_memory();
        let section = page.build("section").id("projects").append_to(page.body());
        let buttons = ["all", "ai-ml", "algorithms", "web"]
            .iter()
            .map(|f| {
                page.build("button")
                    .class("filter-btn")
                    .attr("data-filter", f)
                    .append_to(section)
            })
            .collect();
        let grid = page
            .build("div")
            .id("projects-grid")
            .child("div", |d| d.class("project-card").class("loading-placeholder"))
            .append_to(section);
        (page, grid, buttons)
    }

    fn projects(page: &Page) -> ProjectsComponent {
        ProjectsComponent::new(Arc::new(Config::default()), page.clone())
    }

    fn visible(page: &Page) -> Vec<String> {
        page.query_all(".project-card")
            .into_iter()
            .filter(|c| page.style(*c, "display").as_deref() == Some("block"))
            .map(|c| page.text_content(page.query_within(c, ".project-title").unwrap()))
            .collect()
    }

    #[test]
    fn test_renders_bundled_catalog_replacing_placeholder() {
        let (page, grid, _) = projects_page();
        let mut component = projects(&page);
        component.init().unwrap();

        let cards = page.query_all_within(grid, ".project-card");
        assert_eq!(cards.len(), 13);
        assert!(page.query(".loading-placeholder").is_none());
        assert_eq!(page.attribute(cards[0], "data-tags").as_deref(), Some("ai-ml"));
    }

    #[test]
    fn test_filter_shows_exact_subset() {
        let (page, _, buttons) = projects_page();
        let mut component = projects(&page);
        component.init().unwrap();

        page.click(buttons[2]);
        assert_eq!(component.current_filter(), "algorithms");
        assert!(page.has_class(buttons[2], "active"));
        assert!(!page.has_class(buttons[0], "active"));
        assert_eq!(
            visible(&page),
            vec![
                "Branch and Prune Algorithms",
                "Content-Aware Image Resizing",
                "Hamming Distance Calculator",
                "Algorithmic Problem Collection"
            ]
        );

        let hidden = page.query(".project-card").unwrap();
        assert_eq!(page.style(hidden, "display").as_deref(), Some("none"));
        assert_eq!(page.style(hidden, "opacity").as_deref(), Some("0"));
        assert_eq!(page.style(hidden, "transform").as_deref(), Some("translateY(20px)"));

        page.click(buttons[0]);
        assert_eq!(visible(&page).len(), 13);
    }

    #[test]
    fn test_filter_is_token_not_substring() {
        let (page, _, _) = projects_page();
        let record = |name: &str, tag: &str| ProjectRecord {
            name: name.to_string(),
            description: String::new(),
            tags: vec![tag.to_string()],
            tech_stack: Vec::new(),
            links: ProjectLinks {
                code: "https://example.com".to_string(),
                demo: Some("https://demo.example".to_string()),
            },
            image: None,
        };
        let mut component = projects(&page)
            .with_projects(vec![record("Site", "Web"), record("Design", "Web Design")]);
        component.init().unwrap();

        component.filter_projects("web");
        assert_eq!(visible(&page), vec!["Site"]);
        assert_eq!(page.query_all(".fa-external-link-alt").len(), 2);
    }

    #[test]
    fn test_missing_grid_is_tolerated() {
        let page = Page::in_memory();
        let mut component = projects(&page);
        component.init().unwrap();
        assert!(page.query(".project-card").is_none());
        assert_eq!(component.listener_count(), 0);
    }
}
