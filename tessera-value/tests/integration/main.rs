mod comparison;
mod mutation;
mod navigation;
mod produce;
