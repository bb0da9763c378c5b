use alloy_sol_types::sol;

sol!(
    #[allow(missing_docs, clippy::too_many_arguments)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq, serde::Serialize)]
    interface InvoiceNFT {
        struct Invoice {
            string invoiceNumber;
            uint256 amount;
            uint256 advanceAmount;
            uint256 interestRate;
            uint256 issueDate;
            uint256 dueDate;
            address exporter;
            string buyerCountry;
            string documentHash;
            uint8 status;
            bool shipmentVerified;
        }

        error AccessControlBadConfirmation();
        error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
        error ERC721IncorrectOwner(address sender, uint256 tokenId, address owner);
        error ERC721InsufficientApproval(address operator, uint256 tokenId);
        error ERC721InvalidApprover(address approver);
        error ERC721InvalidOperator(address operator);
        error ERC721InvalidOwner(address owner);
        error ERC721InvalidReceiver(address receiver);
        error ERC721InvalidSender(address sender);
        error ERC721NonexistentToken(uint256 tokenId);
        error EnforcedPause();
        error ExpectedPause();

        event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId);
        event ApprovalForAll(address indexed owner, address indexed operator, bool approved);
        event BatchMetadataUpdate(uint256 _fromTokenId, uint256 _toTokenId);
        event InvoiceBurned(uint256 indexed tokenId, string reason);
        event InvoiceMinted(uint256 indexed tokenId, address indexed exporter, string invoiceNumber, uint256 amount, uint256 dueDate);
        event InvoiceStatusChanged(uint256 indexed tokenId, uint8 oldStatus, uint8 newStatus);
        event MetadataUpdate(uint256 _tokenId);
        event Paused(address account);
        event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole);
        event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender);
        event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender);
        event ShipmentVerified(uint256 indexed tokenId, address verifier);
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event Unpaused(address account);

        function DEFAULT_ADMIN_ROLE() external view returns (bytes32);
        function MINTER_ROLE() external view returns (bytes32);
        function ORACLE_ROLE() external view returns (bytes32);

        function approve(address to, uint256 tokenId) external;
        function balanceOf(address owner) external view returns (uint256);
        function burn(uint256 tokenId) external;
        function burnInvoice(uint256 tokenId, string reason) external;
        function exporterInvoices(address, uint256) external view returns (uint256);
        function getApproved(uint256 tokenId) external view returns (address);
        function getExporterInvoices(address exporter) external view returns (uint256[]);
        function getInvoice(uint256 tokenId) external view returns (Invoice memory);
        function getRoleAdmin(bytes32 role) external view returns (bytes32);
        function getTokenIdByInvoiceNumber(string invoiceNumber) external view returns (uint256);
        function grantRole(bytes32 role, address account) external;
        function hasRole(bytes32 role, address account) external view returns (bool);
        function invoiceNumberToTokenId(string) external view returns (uint256);
        function invoices(uint256) external view returns (
            string invoiceNumber,
            uint256 amount,
            uint256 advanceAmount,
            uint256 interestRate,
            uint256 issueDate,
            uint256 dueDate,
            address exporter,
            string buyerCountry,
            string documentHash,
            uint8 status,
            bool shipmentVerified
        );
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function isFundable(uint256 tokenId) external view returns (bool);
        function mintInvoice(
            address to,
            string invoiceNumber,
            uint256 amount,
            uint256 advanceAmount,
            uint256 interestRate,
            uint256 issueDate,
            uint256 dueDate,
            string buyerCountry,
            string documentHash,
            string uri
        ) external returns (uint256);
        function name() external view returns (string);
        function ownerOf(uint256 tokenId) external view returns (address);
        function pause() external;
        function paused() external view returns (bool);
        function renounceRole(bytes32 role, address callerConfirmation) external;
        function revokeRole(bytes32 role, address account) external;
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function safeTransferFrom(address from, address to, uint256 tokenId, bytes data) external;
        function setApprovalForAll(address operator, bool approved) external;
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
        function symbol() external view returns (string);
        function tokenURI(uint256 tokenId) external view returns (string);
        function totalMinted() external view returns (uint256);
        function transferFrom(address from, address to, uint256 tokenId) external;
        function unpause() external;
        function updateStatus(uint256 tokenId, uint8 newStatus) external;
        function verifyShipment(uint256 tokenId) external;
    }
);
