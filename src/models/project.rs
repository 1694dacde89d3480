use std::fmt;

/// Joins project and task in a combination label.
pub const LABEL_SEPARATOR: &str = " | ";

/// Project names (first column) and task names (second column) of the projects range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectList {
    pub projects: Vec<String>,
    pub tasks: Vec<String>,
}

impl ProjectList {
    /// Collect names from the projects range. A row only contributes a task when
    /// its second cell is present and non-empty.
    pub fn from_sheet_rows(rows: &[Vec<String>]) -> Self {
        let mut list = ProjectList::default();

        for row in rows {
            let Some(project) = row.first() else {
                continue;
            };
            list.projects.push(project.clone());

            if let Some(task) = row.get(1).filter(|task| !task.is_empty()) {
                list.tasks.push(task.clone());
            }
        }

        list
    }

    /// Every distinct project paired with every distinct task, numbered in
    /// enumeration order (projects outer, tasks inner).
    pub fn combinations(&self) -> Vec<ProjectTask> {
        let projects = distinct(&self.projects);
        let tasks = distinct(&self.tasks);

        projects
            .iter()
            .flat_map(|project| tasks.iter().map(move |task| (*project, *task)))
            .enumerate()
            .map(|(id, (project, task))| ProjectTask::new(id, project, task))
            .collect()
    }
}

fn distinct(names: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name.as_str()) {
            seen.push(name.as_str());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTask {
    pub id: usize,
    pub project: String,
    pub task: String,
    pub label: String,
}

impl ProjectTask {
    pub fn new(id: usize, project: &str, task: &str) -> Self {
        Self {
            id,
            project: project.to_string(),
            task: task.to_string(),
            label: format!("{}{}{}", project, LABEL_SEPARATOR, task),
        }
    }
}

impl fmt::Display for ProjectTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn names(data: &[&str]) -> Vec<String> {
        data.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_sheet_rows_splits_columns() {
        let list = ProjectList::from_sheet_rows(&rows(&[
            &["Acme", "Support"],
            &["Initech", "Reports"],
        ]));

        assert_eq!(list.projects, names(&["Acme", "Initech"]));
        assert_eq!(list.tasks, names(&["Support", "Reports"]));
    }

    #[test]
    fn test_from_sheet_rows_single_column_row_has_no_task() {
        let list = ProjectList::from_sheet_rows(&rows(&[
            &["Acme", "Support"],
            &["Initech"],
            &["Globex", ""],
        ]));

        assert_eq!(list.projects, names(&["Acme", "Initech", "Globex"]));
        assert_eq!(list.tasks, names(&["Support"]));
    }

    #[test]
    fn test_from_sheet_rows_skips_empty_rows() {
        let list = ProjectList::from_sheet_rows(&rows(&[&["Acme"], &[], &["Initech"]]));
        assert_eq!(list.projects, names(&["Acme", "Initech"]));
    }

    #[test]
    fn test_combinations_cross_product() {
        let list = ProjectList {
            projects: names(&["Acme", "Initech", "Globex"]),
            tasks: names(&["Support", "Reports"]),
        };

        let combinations = list.combinations();

        assert_eq!(combinations.len(), 6);
        let ids: Vec<usize> = combinations.iter().map(|c| c.id).collect();
        assert_eq!(ids, (0..6).collect::<Vec<_>>());

        let labels: Vec<&str> = combinations.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Acme | Support",
                "Acme | Reports",
                "Initech | Support",
                "Initech | Reports",
                "Globex | Support",
                "Globex | Reports",
            ]
        );
        assert_eq!(labels.iter().collect::<HashSet<_>>().len(), labels.len());
    }

    #[test]
    fn test_combinations_dedupes_names() {
        let list = ProjectList {
            projects: names(&["Acme", "Acme", "Initech"]),
            tasks: names(&["Support", "Support"]),
        };

        let combinations = list.combinations();
        assert_eq!(
            combinations,
            vec![
                ProjectTask::new(0, "Acme", "Support"),
                ProjectTask::new(1, "Initech", "Support"),
            ]
        );
    }

    #[test]
    fn test_combinations_without_tasks_is_empty() {
        let list = ProjectList {
            projects: names(&["Acme"]),
            tasks: vec![],
        };
        assert!(list.combinations().is_empty());
    }

    #[test]
    fn test_display_uses_label() {
        let combination = ProjectTask::new(3, "Acme", "Support");
        assert_eq!(combination.to_string(), "Acme | Support");
    }
}
