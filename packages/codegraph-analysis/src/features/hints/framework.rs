//! Framework rules over the import table and decorators

use crate::shared::models::StructuralModel;

/// Framework tag, recognized by imported module roots or decorator prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkRule {
    pub hint: &'static str,
    /// Matched against the first segment of each imported module
    pub modules: &'static [&'static str],
    /// Matched against the start of decorator text (`pytest.fixture`, `app.route`)
    pub decorator_prefixes: &'static [&'static str],
}

impl FrameworkRule {
    pub fn matches(&self, model: &StructuralModel) -> bool {
        // `from .flask import x` is a project module, not the framework
        let by_import = model
            .imports
            .iter()
            .filter(|import| import.relative_level.is_none())
            .any(|import| self.modules.contains(&import.root_module()));
        if by_import {
            return true;
        }
        if self.decorator_prefixes.is_empty() {
            return false;
        }

        let class_decorators = model.classes.iter().flat_map(|c| c.decorators.iter());
        let function_decorators = model.all_functions().flat_map(|f| f.decorators.iter());
        class_decorators
            .chain(function_decorators)
            .any(|d| self.decorator_prefixes.iter().any(|p| d.starts_with(p)))
    }
}

pub const BUILTIN_FRAMEWORK_RULES: &[FrameworkRule] = &[
    FrameworkRule {
        hint: "Django",
        modules: &["django", "rest_framework"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "Flask",
        modules: &["flask", "flask_sqlalchemy", "flask_login"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "FastAPI",
        modules: &["fastapi", "starlette"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "SQLAlchemy",
        modules: &["sqlalchemy", "flask_sqlalchemy"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "Pydantic",
        modules: &["pydantic"],
        decorator_prefixes: &["validator", "field_validator", "root_validator"],
    },
    FrameworkRule {
        hint: "Pytest",
        modules: &["pytest"],
        decorator_prefixes: &["pytest."],
    },
    FrameworkRule {
        hint: "Unittest",
        modules: &["unittest"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "Celery",
        modules: &["celery"],
        decorator_prefixes: &["shared_task", "celery.task"],
    },
    FrameworkRule {
        hint: "Asyncio",
        modules: &["asyncio", "aiohttp"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "NumPy",
        modules: &["numpy"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "Pandas",
        modules: &["pandas"],
        decorator_prefixes: &[],
    },
    FrameworkRule {
        hint: "Click",
        modules: &["click", "typer"],
        decorator_prefixes: &["click."],
    },
    FrameworkRule {
        hint: "Requests",
        modules: &["requests", "httpx"],
        decorator_prefixes: &[],
    },
];
