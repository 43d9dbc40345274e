//! In-memory record store backing the roster.

use super::types::Student;

/// Ordered, in-memory collection of students.
///
/// Lookups are linear scans in insertion order. The store performs no locking; callers that
/// share it across tasks wrap it in a lock (see [`crate::roster::RosterService`]).
#[derive(Debug, Default)]
pub struct StudentStore {
    students: Vec<Student>,
    next_id: i64,
}

impl StudentStore {
    /// Create an empty store whose first allocated id is `1`.
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store holding the two default students.
    pub fn seeded() -> Self {
        Self::with_students(vec![
            Student {
                id: 1,
                student_name: "studentOne".into(),
                email: "student1email@gmail.com".into(),
                address: "beirut, Lebanon".into(),
            },
            Student {
                id: 2,
                student_name: "studentTwo".into(),
                email: "student2email@gmail.com".into(),
                address: "zahle, Lebanon".into(),
            },
        ])
    }

    /// Create a store from existing records. The id counter starts after the largest id.
    pub fn with_students(students: Vec<Student>) -> Self {
        let next_id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self { students, next_id }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Student] {
        &self.students
    }

    /// First record with a matching id.
    pub fn find_by_id(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Mutable access to the first record with a matching id.
    pub fn find_by_id_mut(&mut self, id: i64) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    /// First record whose name matches exactly (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_name == name)
    }

    /// Reserve the next identifier. Identifiers are never handed out twice, even after deletes.
    pub fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a record. The caller is responsible for assigning a unique id.
    pub fn append(&mut self, student: Student) {
        if student.id >= self.next_id {
            self.next_id = student.id + 1;
        }
        self.students.push(student);
    }

    /// Remove the first record equal to `student`, returning whether one was removed.
    pub fn remove(&mut self, student: &Student) -> bool {
        match self.students.iter().position(|s| s == student) {
            Some(index) => {
                self.students.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
