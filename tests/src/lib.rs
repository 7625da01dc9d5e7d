//! End-to-end runs of the generation workflow against synthetic interfaces,
//! scripted console answers and throwaway working directories.

#[cfg(test)]
mod support;
#[cfg(test)]
mod workflow;
