pub mod path_map;
