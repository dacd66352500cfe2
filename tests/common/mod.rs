pub mod mock_colander;
