//! Python source fixtures

/// Class implementing the context manager protocol
pub const CONTEXT_MANAGER: &str = r#"
class ManagedResource:
    """Opens on enter, closes on exit."""

    def __init__(self, name):
        self.name = name
        self.open = False

    def __enter__(self):
        self.open = True
        return self

    def __exit__(self, exc_type, exc, tb):
        self.open = False
        return False
"#;

/// Classic `_instance` + `__new__` singleton
pub const SINGLETON: &str = r#"
class Registry:
    _instance = None

    def __new__(cls):
        if cls._instance is None:
            cls._instance = super().__new__(cls)
        return cls._instance
"#;

/// Unterminated signature, nothing parses cleanly
pub const BROKEN_FUNCTION: &str = "def broken_function(";

/// Valid statements around one broken definition
pub const MIXED_VALID_INVALID: &str = r#"import os

def ok():
    return os.getcwd()

def broken(:
    pass
"#;

pub const SIMPLE_MODULE: &str = r#""""Small utility module."""

import os
from typing import List

VERSION = "1.0"


def list_dir(path: str) -> List[str]:
    """Names in a directory."""
    if not path:
        return []
    return os.listdir(path)
"#;

/// Exercises every extraction feature in one file
pub const FEATURE_RICH: &str = r#""""Feature rich module.

Second paragraph.
"""

from __future__ import annotations

import json
import os.path as osp
from abc import ABC, abstractmethod
from dataclasses import dataclass, field
from .models import User as Account, Group
from ..shared import *

SEPARATOR = "/"
MAX_RETRIES: int = 3
first = second = 0
counter = 0
counter += 1

try:
    import ujson
    FAST_JSON = True
except ImportError:
    FAST_JSON = False


def plain(a, b=1, *args, c: int = 2, **kwargs) -> dict:
    """Collects its arguments."""
    return {"a": a, "b": b, "args": args, "c": c, "kwargs": kwargs}


async def fetch(url):
    return url


def numbers(limit):
    for i in range(limit):
        if i % 2 == 0 and i > 0:
            yield i


def outer():
    def inner():
        return 1
    return inner()


@dataclass
class Point:
    x: int
    y: int = 0
    tags: list = field(default_factory=list)


class Shape(ABC):
    @abstractmethod
    def area(self):
        ...

    @property
    def name(self):
        return type(self).__name__

    @staticmethod
    def unit():
        return Shape

    @classmethod
    def create_default(cls):
        return cls()


class Square(Shape):
    sides = 4

    def __init__(self, size):
        self.size = size
        self._cache = None
        self.size = size * 1

    def area(self):
        return self.size ** 2
"#;

/// Single-import framework files
pub const DJANGO_VIEW: &str = "from django.http import HttpResponse\n\n\ndef index(request):\n    return HttpResponse('ok')\n";
pub const FASTAPI_APP: &str = "from fastapi import FastAPI\n\napp = FastAPI()\n\n\n@app.get('/')\ndef root():\n    return {}\n";

/// `depth` nested `if` blocks inside one function, one space per level
pub fn deep_nesting(depth: usize) -> String {
    let mut source = String::from("def deep(x):\n");
    for level in 1..=depth {
        source.push_str(&" ".repeat(level));
        source.push_str(&format!("if x > {level}:\n"));
    }
    source.push_str(&" ".repeat(depth + 1));
    source.push_str("return x\n");
    source
}

/// Module with `n` trivial functions
pub fn n_functions(n: usize) -> String {
    (0..n).map(|i| format!("def func_{i}():\n    pass\n\n")).collect()
}

/// Valid Python of roughly `bytes` bytes (a long comment block)
pub fn padded_module(bytes: usize) -> String {
    let mut source = String::with_capacity(bytes + 64);
    source.push_str("X = 1\n");
    let line = format!("# {}\n", "p".repeat(77));
    while source.len() + line.len() <= bytes {
        source.push_str(&line);
    }
    while source.len() < bytes {
        source.push('\n');
    }
    source
}

/// One class with `n` class-level attributes
pub fn wide_class(n: usize) -> String {
    let mut source = String::from("class Wide:\n");
    for i in 0..n {
        source.push_str(&format!("    attr_{i} = {i}\n"));
    }
    source
}

/// A module that is a single class whose second method does not parse
pub const CLASS_WITH_BROKEN_METHOD: &str = r#"class Service:
    def ok(self):
        return 1

    def bad(self):
        x = = 1
"#;
