// SPDX-License-Identifier: MIT

//! Course structure models.
//!
//! A course document embeds its chapters, and each chapter embeds its
//! lessons. Positions are explicit so reordering in the course builder
//! never depends on array order in the store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

/// A single lesson within a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Ordered position within the chapter
    pub position: u32,
}

/// A chapter groups an ordered sequence of lessons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    /// Ordered position within the course
    pub position: u32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Course document with embedded structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    /// User ID of the owning instructor
    pub owner_id: String,
    pub title: String,
    /// Cover image: storage key or full URL
    pub cover_key: Option<String>,
    pub status: CourseStatus,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Course {
    /// Sort chapters and lessons by position.
    ///
    /// Called after reads so the embedded sequences are always in
    /// presentation order regardless of write order.
    pub fn normalize(&mut self) {
        self.chapters.sort_by_key(|c| c.position);
        for chapter in &mut self.chapters {
            chapter.lessons.sort_by_key(|l| l.position);
        }
    }

    /// Total lesson count across all chapters, computed from the live
    /// structure (never cached on enrollments).
    pub fn total_lessons(&self) -> u32 {
        self.chapters.iter().map(|c| c.lessons.len() as u32).sum()
    }

    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.chapters
            .iter()
            .any(|c| c.lessons.iter().any(|l| l.id == lesson_id))
    }
}
