pub mod group;
pub mod ignore;
pub mod scope;
