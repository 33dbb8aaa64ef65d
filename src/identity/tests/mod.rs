//! Unit tests for identity resolution and role administration.
