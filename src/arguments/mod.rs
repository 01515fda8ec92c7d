pub mod modeling;
