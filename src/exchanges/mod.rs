pub mod fundezy;
