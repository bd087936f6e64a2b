//! Generated protobuf/gRPC types for the `employee.v1` package.

pub mod employee {
    pub mod v1 {
        tonic::include_proto!("employee.v1");

        /// Encoded descriptor set used by gRPC server reflection.
        pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("employee_descriptor");
    }
}

pub use employee::v1 as pb;
