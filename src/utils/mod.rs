// Shared utilities for the scanner shell

/// Path display helpers (relative, Unix-style)
pub mod paths;

/// include / ignore path patterns
pub mod ignore;
