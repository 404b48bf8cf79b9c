//! Unit tests for the control-channel wire types.
