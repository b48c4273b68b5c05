// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Request validation properties: acceptance, rule ordering, and reported
//! worker group indices.

mod validation;
