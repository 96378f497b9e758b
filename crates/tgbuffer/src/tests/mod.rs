
mod buffer_construct;
