//! Dashboard with the four count cards

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::DropGuard;

use super::Screen;
use crate::client::{ClientError, CourseStatusApi, ListApi};
use crate::lifetime::Lifetime;
use crate::models::{Blog, CourseStatusCount, News, Student};

/// Totals zero-padded to two digits, e.g. `07`
pub fn pad2(n: u64) -> String {
    format!("{:02}", n)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardTotals {
    pub courses: CourseStatusCount,
    pub news: u64,
    pub students: u64,
    pub blogs: u64,
}

pub struct Dashboard {
    courses: Arc<dyn CourseStatusApi>,
    news: Arc<dyn ListApi<News>>,
    students: Arc<dyn ListApi<Student>>,
    blogs: Arc<dyn ListApi<Blog>>,
    totals: DashboardTotals,
    lifetime: Lifetime,
    _end_on_drop: DropGuard,
}

/// Keep the previous value when a count fails
fn apply<T>(slot: &mut T, card: &str, result: Result<T, ClientError>) {
    match result {
        Ok(value) => *slot = value,
        Err(e) => tracing::warn!(card, error = %e, "failed to load dashboard count"),
    }
}

impl Dashboard {
    pub fn new(
        courses: Arc<dyn CourseStatusApi>,
        news: Arc<dyn ListApi<News>>,
        students: Arc<dyn ListApi<Student>>,
        blogs: Arc<dyn ListApi<Blog>>,
        parent: &Lifetime,
    ) -> Self {
        let lifetime = parent.child();
        Self {
            courses,
            news,
            students,
            blogs,
            totals: DashboardTotals::default(),
            _end_on_drop: lifetime.end_on_drop(),
            lifetime,
        }
    }

    pub fn totals(&self) -> DashboardTotals {
        self.totals
    }

    /// Fetch all four counts concurrently; each card fails on its own
    pub async fn load(&mut self) {
        let fetch = async {
            futures::join!(
                self.courses.status_count(),
                self.news.count(),
                self.students.count(),
                self.blogs.count(),
            )
        };
        let Ok((courses, news, students, blogs)) = self.lifetime.guard(fetch).await else {
            return;
        };

        apply(&mut self.totals.courses, "courses", courses);
        apply(&mut self.totals.news, "news", news);
        apply(&mut self.totals.students, "students", students);
        apply(&mut self.totals.blogs, "blogs", blogs);
        tracing::debug!(totals = ?self.totals, "dashboard loaded");
    }
}

#[async_trait]
impl Screen for Dashboard {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let t = &self.totals;
        format!(
            "== Dashboard ==\n\
             Total Courses  {}   Active: {} | Inactive: {}\n\
             Total News     {}\n\
             Total Students {}\n\
             Total Blogs    {}\n",
            pad2(t.courses.total()),
            t.courses.active_courses,
            t.courses.inactive_courses,
            pad2(t.news),
            pad2(t.students),
            pad2(t.blogs),
        )
    }
}
